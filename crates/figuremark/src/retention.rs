//! Keeping the block source next to the generated figure.

use crate::directives::RetainBlock;

/// Prepend the block source to `figure` according to `policy`.
///
/// - [`RetainBlock::Comment`]: the source inside `<!--` and `-->`. A figure
///   block directly after `<!--` is never matched again.
/// - [`RetainBlock::Indent`]: every source line prefixed with a tab. Indented
///   fences are never matched again.
#[must_use]
pub fn retain(policy: RetainBlock, source: &str, figure: String) -> String {
    match policy {
        RetainBlock::None => figure,
        RetainBlock::Comment => format!("<!--\n{source}\n-->\n\n{figure}"),
        RetainBlock::Indent => {
            let mut output = String::with_capacity(source.len() + figure.len() + 16);
            for line in source.split_inclusive('\n') {
                output.push('\t');
                output.push_str(line);
            }
            output.push_str("\n\n");
            output.push_str(&figure);
            output
        }
    }
}
