//! Figure numbering.
//!
//! Figures written directly as HTML share the numbering sequence with
//! figure blocks, so `<figure>` elements in the text between two blocks
//! advance the counter too.

use std::sync::LazyLock;

use regex::Regex;

static EXTERNAL_FIGURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<figure[^>]*>.+?</figure>").unwrap());

/// Count `<figure>...</figure>` elements in `text`.
pub(crate) fn count_external_figures(text: &str) -> usize {
    EXTERNAL_FIGURE.find_iter(text).count()
}

/// Running figure number for one document.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FigureCounter {
    current: usize,
}

impl FigureCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Account for external figures in `gap`, then number the next block.
    pub(crate) fn advance(&mut self, gap: &str) -> usize {
        let external = count_external_figures(gap);
        if external > 0 {
            tracing::debug!(external, "Counted external figures");
        }
        self.current += external + 1;
        self.current
    }
}
