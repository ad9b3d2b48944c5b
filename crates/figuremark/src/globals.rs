//! Global directive lines.
//!
//! A line consisting solely of `{figure <attributes>}` (or `{figuremark ...}`)
//! sets attributes and directives for every later figure block in the
//! document. Lines are folded into the running global state in source order
//! with [`AttributeSet::apply_override`], so a later line can replace or remove
//! what an earlier one set.

use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::AttributeSet;
use crate::segments::Segments;

static GLOBALS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\{figure(?:mark)?[ \t]*([^}\n]*)\}[ \t\r]*$").unwrap()
});

/// Fold every global line in `gap` into `globals` and keep the rest of `gap`.
///
/// Matched line content is dropped from the output; the line break after it
/// is kept. Returns the number of global lines found.
pub(crate) fn fold_globals<'a>(
    gap: &'a str,
    globals: &mut AttributeSet,
    segments: &mut Segments<'a>,
) -> usize {
    let mut kept = 0;
    let mut count = 0;

    for caps in GLOBALS_PATTERN.captures_iter(gap) {
        let (Some(line), Some(raw)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        globals.apply_override(&AttributeSet::parse(raw.as_str()));
        segments.keep(&gap[kept..line.start()]);
        kept = line.end();
        count += 1;
    }
    segments.keep(&gap[kept..]);

    if count > 0 {
        tracing::debug!(count, "Folded global directive lines");
    }
    count
}
