//! Attribute lists for figure blocks, spans and global lines.
//!
//! Parses the `{#id .class key="value" :directive=value}` syntax into an
//! [`AttributeSet`] and renders it back as HTML attributes.
//!
//! # Removal
//!
//! The removal token `-:` marks entries to delete rather than assign:
//!
//! | Syntax       | Effect                                  |
//! |--------------|-----------------------------------------|
//! | `.-:`        | remove every class                      |
//! | `.-:name`    | remove the class `name`                 |
//! | `#-:`        | remove any id                           |
//! | `#-:name`    | remove the id if it is `name`           |
//! | `key=-:`     | remove the attribute `key`              |
//! | `-:=`        | remove every attribute                  |
//! | `:key=-:`    | remove the directive `key`              |
//! | `:-:=`       | remove every directive                  |
//!
//! The parser turns these into [`Removal`] operations; only
//! [`AttributeSet::apply_override`] acts on them.

mod merge;
mod parser;

use std::collections::BTreeMap;
use std::fmt;

/// Class carried by every element FigureMark generates.
pub const SHARED_CLASS: &str = "figuremark";

/// Prefix routing a `key=value` pair to the directives map.
pub const DIRECTIVE_PREFIX: char = ':';

/// Reserved token requesting removal during an override merge.
pub const REMOVE_TOKEN: &str = "-:";

/// A removal requested by an attribute list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Removal {
    /// Remove the single named entry.
    One(String),
    /// Remove every entry of the kind.
    All,
}

/// Removals collected while parsing, grouped by what they target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Removals {
    /// Id removal (`#-:` or `#-:name`).
    pub id: Option<Removal>,
    /// Class removals, in source order.
    pub classes: Vec<Removal>,
    /// Attribute removals, in source order.
    pub attributes: Vec<Removal>,
    /// Directive removals, in source order.
    pub directives: Vec<Removal>,
}

impl Removals {
    /// Whether no removal was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.directives.is_empty()
    }
}

/// Parsed attribute list.
///
/// # Example
///
/// ```
/// use figuremark::AttributeSet;
///
/// let attrs = AttributeSet::parse(r#"#fig-a .note data-x="1" :caption-before=false"#);
/// assert_eq!(attrs.id.as_deref(), Some("fig-a"));
/// assert_eq!(attrs.classes(), ["figuremark", "note"]);
/// assert_eq!(attrs.attribute("data-x"), Some("1"));
/// assert_eq!(attrs.directive("caption-before"), Some("false"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSet {
    /// Element id.
    pub id: Option<String>,
    /// Insertion-ordered, duplicate-free classes.
    classes: Vec<String>,
    /// HTML attributes other than `id` and `class`.
    pub attributes: BTreeMap<String, String>,
    /// Rendering directives, keyed without the `:` prefix.
    pub directives: BTreeMap<String, String>,
    removals: Removals,
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeSet {
    /// Create a set holding only the shared marker class.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            classes: vec![SHARED_CLASS.to_owned()],
            attributes: BTreeMap::new(),
            directives: BTreeMap::new(),
            removals: Removals::default(),
        }
    }

    /// Classes in insertion order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check whether a class is present.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Append a class unless it is already present.
    ///
    /// Returns `true` if the class was added.
    pub fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_owned());
        true
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get a directive value by key (without the `:` prefix).
    #[must_use]
    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }

    /// Removals requested by this attribute list.
    #[must_use]
    pub fn removals(&self) -> &Removals {
        &self.removals
    }
}

/// Renders as HTML attributes with a leading space: ` id="a" class="b c" key="v"`.
///
/// Directives and removals never render.
impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, r#" id="{}""#, escape_quotes(id))?;
        }
        if !self.classes.is_empty() {
            write!(f, r#" class="{}""#, escape_quotes(&self.classes.join(" ")))?;
        }
        for (key, value) in &self.attributes {
            write!(f, r#" {key}="{}""#, escape_quotes(value))?;
        }
        Ok(())
    }
}

fn escape_quotes(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains('"') {
        value.replace('"', "&quot;").into()
    } else {
        value.into()
    }
}
