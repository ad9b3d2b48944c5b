//! Rendering directives.
//!
//! Directives are the `:key=value` entries of an attribute list. They control
//! how a figure is rendered and are never emitted as HTML attributes.
//!
//! | Key              | Values                          | Default  |
//! |------------------|---------------------------------|----------|
//! | `fig-num-format` | text, `#` replaced by the number | `Fig. #` |
//! | `empty-captions` | `true` / `false`                | `true`   |
//! | `caption-before` | `true` / `false`                | `true`   |
//! | `link-caption`   | `num`, `title`, `all`, `none`   | `num`    |
//! | `retain-block`   | `none`, `comment`, `indent`     | `none`   |

use crate::attrs::AttributeSet;

pub const NUMBER_FORMAT: &str = "fig-num-format";
pub const EMPTY_CAPTIONS: &str = "empty-captions";
pub const CAPTION_BEFORE: &str = "caption-before";
pub const LINK_CAPTION: &str = "link-caption";
pub const RETAIN_BLOCK: &str = "retain-block";

const DEFAULT_NUMBER_FORMAT: &str = "Fig. #";
const NUMBER_PLACEHOLDER: char = '#';

/// Which part of the caption links to the figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkCaption {
    /// The number label.
    #[default]
    Number,
    /// The title text.
    Title,
    /// Both spans, wrapped in a single link.
    All,
    /// No link.
    None,
}

impl LinkCaption {
    /// Parse a directive value; unknown values give the default.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "title" => Self::Title,
            "all" => Self::All,
            "none" => Self::None,
            _ => Self::Number,
        }
    }
}

/// How the block source is kept next to the generated figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetainBlock {
    /// Drop the source.
    #[default]
    None,
    /// Keep the source inside an HTML comment.
    Comment,
    /// Keep the source tab-indented.
    Indent,
}

impl RetainBlock {
    /// Parse a directive value; unknown values give the default.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "comment" => Self::Comment,
            "indent" => Self::Indent,
            _ => Self::None,
        }
    }
}

/// Directive values resolved against their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    pub number_format: String,
    pub empty_captions: bool,
    pub caption_before: bool,
    pub link_caption: LinkCaption,
    pub retain_block: RetainBlock,
}

impl Default for Directives {
    fn default() -> Self {
        Self {
            number_format: DEFAULT_NUMBER_FORMAT.to_owned(),
            empty_captions: true,
            caption_before: true,
            link_caption: LinkCaption::default(),
            retain_block: RetainBlock::default(),
        }
    }
}

impl Directives {
    /// Read directives from a merged attribute set.
    ///
    /// Unknown keys are ignored. Booleans are `true` only for the literal
    /// value `true`.
    #[must_use]
    pub fn resolve(attrs: &AttributeSet) -> Self {
        let defaults = Self::default();
        Self {
            number_format: attrs
                .directive(NUMBER_FORMAT)
                .map_or(defaults.number_format, str::to_owned),
            empty_captions: attrs
                .directive(EMPTY_CAPTIONS)
                .map_or(defaults.empty_captions, is_true),
            caption_before: attrs
                .directive(CAPTION_BEFORE)
                .map_or(defaults.caption_before, is_true),
            link_caption: attrs
                .directive(LINK_CAPTION)
                .map_or(defaults.link_caption, LinkCaption::parse),
            retain_block: attrs
                .directive(RETAIN_BLOCK)
                .map_or(defaults.retain_block, RetainBlock::parse),
        }
    }

    /// Number label for a figure, e.g. `Fig. 3`.
    #[must_use]
    pub fn label(&self, number: usize) -> String {
        self.number_format
            .replace(NUMBER_PLACEHOLDER, &number.to_string())
    }
}

fn is_true(value: &str) -> bool {
    value == "true"
}
