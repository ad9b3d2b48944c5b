//! Host integration.
//!
//! Hosts expose their documents through [`Document`] and hand them to
//! [`process_document`], which decides, converts and reports.

use crate::processor::FigureProcessor;

/// A document owned by the host application.
pub trait Document {
    /// Whether figure blocks in this document should be rewritten.
    fn should_process(&self) -> bool;

    /// Current source text.
    fn text(&self) -> &str;

    /// Replace the source text.
    fn set_text(&mut self, text: String);
}

/// Rewrite figure blocks in `doc` if it opts in.
///
/// Returns the number of blocks rewritten. Documents that opt out are left
/// untouched and report zero.
pub fn process_document<D: Document + ?Sized>(processor: &FigureProcessor, doc: &mut D) -> usize {
    if !doc.should_process() {
        return 0;
    }

    let conversion = processor.process(doc.text());
    let count = conversion.count();
    if count > 0 {
        tracing::debug!(count, "Processed FigureMark blocks");
        doc.set_text(conversion.text);
    } else {
        tracing::debug!("No FigureMark blocks found");
    }
    count
}
