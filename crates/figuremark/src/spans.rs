//! Inline span annotation inside figure bodies.
//!
//! Two inline forms are rewritten:
//!
//! - `[text]{marker}`: a mark (`+ - / > !`) or an attribute list
//! - `{N}`: a numbered reference marker (digits, `.` and `-`)
//!
//! Backslash escapes (`\[ \] \{ \} \\`) never open or close a span and are
//! unescaped once all spans are rewritten.

use crate::attrs::{AttributeSet, SHARED_CLASS};

/// Single-character marks and the classes they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// `+`
    Insert,
    /// `-`
    Remove,
    /// `/`
    Comment,
    /// `>`
    Result,
    /// `!`
    Highlight,
}

impl Mark {
    /// Look up a mark by its marker text.
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "+" => Some(Self::Insert),
            "-" => Some(Self::Remove),
            "/" => Some(Self::Comment),
            ">" => Some(Self::Result),
            "!" => Some(Self::Highlight),
            _ => None,
        }
    }

    /// CSS class emitted for this mark.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::Comment => "comment",
            Self::Result => "result",
            Self::Highlight => "highlight",
        }
    }
}

/// A matched span: source range plus its rendering.
struct SpanMatch {
    end: usize,
    html: String,
}

/// Rewrite inline spans in a block body.
///
/// Matches are found left to right without overlap; generated markup is
/// never rescanned.
///
/// # Example
///
/// ```
/// use figuremark::annotate;
///
/// assert_eq!(
///     annotate("a [very]{!} big {1} deal \\[sic\\]"),
///     r#"a <span class="figuremark highlight">very</span> big <span class="figuremark reference reference-1">1</span> deal [sic]"#
/// );
/// ```
#[must_use]
pub fn annotate(body: &str) -> String {
    let bytes = body.as_bytes();
    let mut output = String::with_capacity(body.len());
    let mut copied = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let span = match bytes[pos] {
            b'\\' => {
                pos += escape_len(bytes, pos);
                continue;
            }
            b'[' => match_bracketed(body, pos),
            b'{' => match_reference(body, pos),
            _ => None,
        };

        match span {
            Some(span) => {
                output.push_str(&body[copied..pos]);
                output.push_str(&span.html);
                pos = span.end;
                copied = pos;
            }
            None => pos += 1,
        }
    }
    output.push_str(&body[copied..]);

    unescape(&output)
}

/// Remove backslashes in front of `[ ] { } \`.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.clone().next() {
                Some(next) if is_escapable(next) => {
                    output.push(next);
                    chars.next();
                }
                _ => output.push(c),
            }
        } else {
            output.push(c);
        }
    }
    output
}

fn is_escapable(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | '\\')
}

/// Bytes taken by a backslash at `pos`: 2 for an escape pair, else 1.
fn escape_len(bytes: &[u8], pos: usize) -> usize {
    match bytes.get(pos + 1) {
        Some(&next) if is_escapable(char::from(next)) => 2,
        _ => 1,
    }
}

/// Match `[text]{marker}` with the `[` at `open`.
///
/// `text` is non-empty, stays on one line and ends at the first unescaped
/// `]` that is directly followed by a valid `{marker}`.
fn match_bracketed(body: &str, open: usize) -> Option<SpanMatch> {
    let bytes = body.as_bytes();
    let text_start = open + 1;
    let mut pos = text_start;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' => return None,
            b'\\' => {
                pos += escape_len(bytes, pos);
                continue;
            }
            b']' if pos > text_start => {
                if let Some((marker, end)) = braced(body, pos + 1) {
                    let text = &body[text_start..pos];
                    return Some(SpanMatch {
                        end,
                        html: render_span(text, marker),
                    });
                }
            }
            _ => {}
        }
        pos += 1;
    }

    None
}

/// Match a non-empty `{...}` without nested `}` starting at `open`.
fn braced(body: &str, open: usize) -> Option<(&str, usize)> {
    let rest = body.get(open..)?.strip_prefix('{')?;
    let close = rest.find('}')?;
    if close == 0 {
        return None;
    }
    Some((&rest[..close], open + close + 2))
}

/// Match a `{N}` reference marker with the `{` at `open`.
fn match_reference(body: &str, open: usize) -> Option<SpanMatch> {
    let (number, end) = braced(body, open)?;
    if !number
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
    {
        return None;
    }
    Some(SpanMatch {
        end,
        html: format!(
            r#"<span class="{SHARED_CLASS} reference reference-{number}">{number}</span>"#
        ),
    })
}

fn render_span(text: &str, marker: &str) -> String {
    if let Some(mark) = Mark::from_marker(marker) {
        return format!(
            r#"<span class="{SHARED_CLASS} {}">{text}</span>"#,
            mark.class_name()
        );
    }
    let attrs = AttributeSet::parse(marker);
    format!("<span{attrs}>{text}</span>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(annotate("fn main() {}\n"), "fn main() {}\n");
    }

    #[test]
    fn test_highlight_mark() {
        assert_eq!(
            annotate("[important]{!}"),
            r#"<span class="figuremark highlight">important</span>"#
        );
    }

    #[test]
    fn test_all_marks() {
        for (marker, class) in [
            ("+", "insert"),
            ("-", "remove"),
            ("/", "comment"),
            (">", "result"),
            ("!", "highlight"),
        ] {
            assert_eq!(
                annotate(&format!("[x]{{{marker}}}")),
                format!(r#"<span class="figuremark {class}">x</span>"#)
            );
        }
    }

    #[test]
    fn test_reference() {
        assert_eq!(
            annotate("{3}"),
            r#"<span class="figuremark reference reference-3">3</span>"#
        );
    }

    #[test]
    fn test_dotted_reference() {
        assert_eq!(
            annotate("see {2.1-a}, {1.2-3}"),
            r#"see {2.1-a}, <span class="figuremark reference reference-1.2-3">1.2-3</span>"#
        );
    }

    #[test]
    fn test_attribute_span() {
        assert_eq!(
            annotate("[word]{.term #t1 data-x=1}"),
            r#"<span id="t1" class="figuremark term" data-x="1">word</span>"#
        );
    }

    #[test]
    fn test_attribute_span_directives_not_rendered() {
        assert_eq!(
            annotate("[word]{:caption-before=false}"),
            r#"<span class="figuremark">word</span>"#
        );
    }

    #[test]
    fn test_multiple_spans_on_line() {
        assert_eq!(
            annotate("[a]{+} and [b]{-}"),
            r#"<span class="figuremark insert">a</span> and <span class="figuremark remove">b</span>"#
        );
    }

    #[test]
    fn test_text_extends_to_first_valid_close() {
        assert_eq!(
            annotate("[a] and [b]{!}"),
            r#"<span class="figuremark highlight">a] and [b</span>"#
        );
    }

    #[test]
    fn test_span_text_is_single_line() {
        assert_eq!(annotate("[a\nb]{!}"), "[a\nb]{!}");
    }

    #[test]
    fn test_empty_text_or_marker_not_span() {
        assert_eq!(annotate("[]{!}"), "[]{!}");
        assert_eq!(annotate("[a]{}"), "[a]{}");
        assert_eq!(annotate("{}"), "{}");
    }

    #[test]
    fn test_reference_inside_span_text_untouched() {
        assert_eq!(
            annotate("[see {1}]{/}"),
            r#"<span class="figuremark comment">see {1}</span>"#
        );
    }

    #[test]
    fn test_escaped_brackets_literal() {
        assert_eq!(annotate(r"\[x\]{!}"), "[x]{!}");
        assert_eq!(annotate(r"\{3\}"), "{3}");
        assert_eq!(annotate(r"\{3}"), "{3}");
    }

    #[test]
    fn test_escaped_close_bracket_inside_text() {
        assert_eq!(
            annotate(r"[a\]b]{!}"),
            r#"<span class="figuremark highlight">a]b</span>"#
        );
    }

    #[test]
    fn test_escaped_backslash_before_span() {
        assert_eq!(
            annotate(r"\\[x]{!}"),
            r#"\<span class="figuremark highlight">x</span>"#
        );
    }

    #[test]
    fn test_marker_ends_at_first_close_brace() {
        assert_eq!(
            annotate(r#"[a]{title="[b]{!}"}"#),
            r#"<span class="figuremark" title="[b]{!">a</span>"}"#
        );
    }

    #[test]
    fn test_unicode_text() {
        assert_eq!(
            annotate("über [grüße]{!} ✓"),
            r#"über <span class="figuremark highlight">grüße</span> ✓"#
        );
    }

    #[test]
    fn test_unescape_only_known_escapes() {
        assert_eq!(unescape(r"a\nb \[ \\ \}"), r"a\nb [ \ }");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_mark_lookup() {
        assert_eq!(Mark::from_marker("!"), Some(Mark::Highlight));
        assert_eq!(Mark::from_marker("!!"), None);
        assert_eq!(Mark::Result.class_name(), "result");
    }
}
