//! Output assembly from unchanged and replaced segments.
//!
//! The driver never edits the source in place. It records, in order, the
//! slices it keeps and the text it generates, then joins them once.

use std::borrow::Cow;

/// Ordered output segments for a single document.
///
/// # Example
///
/// ```ignore
/// let mut segments = Segments::new();
/// segments.keep("before ");
/// segments.replace("<figure></figure>".to_owned());
/// segments.keep(" after");
/// assert_eq!(segments.finish(), "before <figure></figure> after");
/// ```
#[derive(Debug, Default)]
pub(crate) struct Segments<'a> {
    items: Vec<Cow<'a, str>>,
}

impl<'a> Segments<'a> {
    /// Create an empty segment list.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Keep a slice of the source unchanged.
    pub(crate) fn keep(&mut self, text: &'a str) {
        if !text.is_empty() {
            self.items.push(Cow::Borrowed(text));
        }
    }

    /// Append generated text.
    pub(crate) fn replace(&mut self, text: String) {
        if !text.is_empty() {
            self.items.push(Cow::Owned(text));
        }
    }

    /// Number of recorded segments.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Join all segments into the output text.
    pub(crate) fn finish(self) -> String {
        let capacity = self.items.iter().map(|s| s.len()).sum();
        let mut output = String::with_capacity(capacity);
        for item in self.items {
            output.push_str(&item);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_segments() {
        assert_eq!(Segments::new().finish(), "");
    }

    #[test]
    fn test_keep_only() {
        let mut segments = Segments::new();
        segments.keep("hello ");
        segments.keep("world");
        assert_eq!(segments.finish(), "hello world");
    }

    #[test]
    fn test_order_preserved() {
        let mut segments = Segments::new();
        segments.keep("before ");
        segments.replace("<figure></figure>".to_owned());
        segments.keep(" after");
        assert_eq!(segments.finish(), "before <figure></figure> after");
    }

    #[test]
    fn test_empty_pieces_skipped() {
        let mut segments = Segments::new();
        segments.keep("");
        segments.replace(String::new());
        segments.keep("x");
        assert_eq!(segments.len(), 1);
    }
}
