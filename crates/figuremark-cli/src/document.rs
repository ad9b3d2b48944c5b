//! Markdown files as FigureMark documents.
//!
//! A file opts in or out with a `figuremark` key in its YAML front matter:
//!
//! ```markdown
//! ---
//! title: Architecture
//! figuremark: true
//! ---
//! ```
//!
//! Files without the key follow the site-wide default. Any value other than
//! `true` (including `yes`, `"true"` or an empty value) turns conversion off.

use std::path::{Path, PathBuf};

use figuremark::Document;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// Front matter fields read by FigureMark.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default, deserialize_with = "present")]
    figuremark: Option<Value>,
}

/// Keep a present key as `Some` even when its value is null.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Extract the YAML between the leading `---` delimiters.
///
/// The block must start on the first line and end with a `---` or `...`
/// line. Returns `None` if the text has no front matter.
pub(crate) fn front_matter(text: &str) -> Option<&str> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

/// Read the `figuremark` flag from a document's front matter.
///
/// A present key yields `Some(true)` only for the YAML boolean `true`.
/// Malformed front matter is logged and treated as absent.
pub(crate) fn figuremark_flag(text: &str, path: &Path) -> Option<bool> {
    let yaml = front_matter(text)?;
    if yaml.trim().is_empty() {
        return None;
    }
    match serde_yaml::from_str::<FrontMatter>(yaml) {
        Ok(front) => front
            .figuremark
            .map(|value| value == Value::Bool(true)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed front matter");
            None
        }
    }
}

/// A Markdown file loaded for conversion.
#[derive(Debug)]
pub(crate) struct MarkdownFile {
    path: PathBuf,
    text: String,
    enabled: bool,
}

impl MarkdownFile {
    /// Wrap file contents, resolving the enabled flag against `default_enabled`.
    pub(crate) fn new(path: impl Into<PathBuf>, text: String, default_enabled: bool) -> Self {
        let path = path.into();
        let enabled = figuremark_flag(&text, &path).unwrap_or(default_enabled);
        Self {
            path,
            text,
            enabled,
        }
    }

    /// Source path.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the file, returning its current text.
    pub(crate) fn into_text(self) -> String {
        self.text
    }
}

impl Document for MarkdownFile {
    fn should_process(&self) -> bool {
        self.enabled
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}
