//! Captioned HTML figures from fenced Markdown blocks.
//!
//! FigureMark rewrites fenced blocks opened with `figure` or `figuremark`
//! into `<figure>` elements with a numbered, linked caption, and annotates
//! inline spans in their bodies. It is a text-to-text transform run before
//! Markdown rendering; everything outside figure blocks passes through.
//!
//! # Syntax
//!
//! ````markdown
//! {figure :link-caption=all}
//!
//! ```figuremark Request flow {#flow .wide}
//! client -> [gateway]{!} -> service {1}
//! ```
//! ````
//!
//! - The opening line takes an optional title and an attribute list
//! - A line holding only `{figure ...}` sets attributes and directives for
//!   every later block in the document
//! - `[text]{+}` marks an insertion; `-`, `/`, `>` and `!` mark removals,
//!   comments, results and highlights
//! - `[text]{.class #id key=value}` wraps text in a span with attributes
//! - `{N}` marks a numbered reference
//! - `\[`, `\]`, `\{`, `\}` and `\\` escape the span syntax
//!
//! # Example
//!
//! ```
//! use figuremark::FigureProcessor;
//!
//! let markdown = "```figure Overview {:link-caption=none}\nHello\n```";
//! let conversion = FigureProcessor::new().process(markdown);
//! assert_eq!(
//!     conversion.text,
//!     "<figure id=\"figure-1\" class=\"figuremark\" data-fignum=\"1\">\
//! <figcaption><span class=\"figure-number\">Fig. 1</span><span class=\"figure-title\">Overview</span></figcaption>\n\
//! <div class=\"figure-content\">Hello</div></figure>"
//! );
//! ```

mod attrs;
mod block;
mod caption;
mod directives;
mod document;
mod fence;
mod globals;
mod numbering;
mod processor;
mod retention;
mod segments;
mod spans;

pub use attrs::{AttributeSet, DIRECTIVE_PREFIX, REMOVE_TOKEN, Removal, Removals, SHARED_CLASS};
pub use caption::compose;
pub use directives::{
    CAPTION_BEFORE, Directives, EMPTY_CAPTIONS, LINK_CAPTION, LinkCaption, NUMBER_FORMAT,
    RETAIN_BLOCK, RetainBlock,
};
pub use document::{Document, process_document};
pub use processor::{Conversion, FIGNUM_ATTRIBUTE, FigureMetadata, FigureProcessor, convert};
pub use retention::retain;
pub use spans::{Mark, annotate, unescape};
