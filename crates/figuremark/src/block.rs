//! Locating fenced figure blocks.
//!
//! ```markdown
//! ```figuremark Optional title {.class #id :directive=value}
//! body
//! ```
//! ```

use crate::fence::Fence;

/// Delimiter written in front of a block retained as a comment.
pub(crate) const COMMENT_OPEN: &str = "<!--\n";

/// A figure block found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FigureBlock<'a> {
    /// Byte offset of the opening fence.
    pub start: usize,
    /// Byte offset just past the closing fence line (before its newline).
    pub end: usize,
    /// Caption title, trimmed; empty if absent.
    pub title: &'a str,
    /// Raw attribute list from the opening line.
    pub attributes: Option<&'a str>,
    /// Text between the opening and closing lines.
    pub body: &'a str,
    /// Full block source, opening fence through closing fence.
    pub source: &'a str,
}

/// Parsed opening line.
#[derive(Debug, PartialEq, Eq)]
struct Opening<'a> {
    fence: Fence,
    title: &'a str,
    attributes: Option<&'a str>,
}

/// Find the first complete figure block starting at or after `from`.
///
/// Scanning begins at the first line start at or after `from`. Blocks whose
/// opening line directly follows [`COMMENT_OPEN`] are skipped, as are blocks
/// without a closing fence.
pub(crate) fn find_next(text: &str, from: usize) -> Option<FigureBlock<'_>> {
    let start = line_start_at_or_after(text, from)?;
    let mut lines = lines_from(text, start);

    while let Some((line_start, line)) = lines.next() {
        let Some(opening) = parse_opening(line) else {
            continue;
        };
        if text[..line_start].ends_with(COMMENT_OPEN) {
            continue;
        }

        let Some((close_start, close_line)) = lines
            .clone()
            .find(|(_, l)| opening.fence.closes(l))
        else {
            continue;
        };

        let body_start = line_start + line.len() + 1;
        let body_end = close_start.saturating_sub(1).max(body_start);
        let end = close_start + close_line.len();

        return Some(FigureBlock {
            start: line_start,
            end,
            title: opening.title,
            attributes: opening.attributes,
            body: &text[body_start..body_end],
            source: &text[line_start..end],
        });
    }

    None
}

/// Parse a figure block opening line.
///
/// Accepts the fence, optional whitespace, `figure` or `figuremark` in any
/// case, then an optional whitespace-separated title (no `{`), an optional
/// `{attributes}` list (no `}`), and nothing but whitespace after that.
fn parse_opening(line: &str) -> Option<Opening<'_>> {
    let fence = Fence::detect(line)?;
    let rest = line[fence.len()..].trim_start();
    let rest = strip_prefix_ignore_case(rest, "figure")?;
    let rest = strip_prefix_ignore_case(rest, "mark").unwrap_or(rest);

    if !(rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with('{')) {
        return None;
    }

    let rest = rest.trim();
    let (title, attributes) = match rest.find('{') {
        None => (rest, None),
        Some(open) => {
            let inner = &rest[open + 1..];
            let close = inner.find('}')?;
            if !inner[close + 1..].trim().is_empty() {
                return None;
            }
            (rest[..open].trim_end(), Some(&inner[..close]))
        }
    };

    Some(Opening {
        fence,
        title,
        attributes,
    })
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// First line start at or after `pos`.
fn line_start_at_or_after(text: &str, pos: usize) -> Option<usize> {
    if pos >= text.len() {
        return None;
    }
    if pos == 0 || text.as_bytes()[pos - 1] == b'\n' {
        return Some(pos);
    }
    let next = pos + text[pos..].find('\n')? + 1;
    (next < text.len()).then_some(next)
}

/// Lines from `start` with their byte offsets, newline stripped.
fn lines_from(text: &str, start: usize) -> impl Iterator<Item = (usize, &str)> + Clone {
    text[start..]
        .split_inclusive('\n')
        .scan(start, |offset, raw| {
            let line_start = *offset;
            *offset += raw.len();
            Some((line_start, raw.strip_suffix('\n').unwrap_or(raw)))
        })
}
