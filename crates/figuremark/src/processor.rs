//! Figure block rewriting.
//!
//! [`FigureProcessor`] makes a single left-to-right pass over a document.
//! For every figure block it:
//!
//! 1. Folds global lines between the previous block and this one into the
//!    running global state and drops them from the output
//! 2. Advances the figure number past any external `<figure>` elements
//! 3. Annotates spans in the body
//! 4. Merges the block's attributes over the globals
//! 5. Composes the caption and applies block retention
//!
//! Text after the cursor is never rescanned, so generated markup is not
//! processed again.

use crate::attrs::AttributeSet;
use crate::block::{self, FigureBlock};
use crate::caption;
use crate::directives::Directives;
use crate::globals::fold_globals;
use crate::numbering::FigureCounter;
use crate::retention::retain;
use crate::segments::Segments;
use crate::spans::annotate;

/// Attribute carrying the figure number on the generated element.
pub const FIGNUM_ATTRIBUTE: &str = "data-fignum";

/// Metadata about a rewritten figure block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureMetadata {
    /// Figure number, counting external figures.
    pub number: usize,
    /// Element id of the generated figure.
    pub id: String,
    /// Caption title (empty if none).
    pub title: String,
    /// Line of the opening fence (1-indexed).
    pub line: usize,
}

/// Result of converting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Rewritten text.
    pub text: String,
    /// Rewritten blocks in document order.
    pub figures: Vec<FigureMetadata>,
}

impl Conversion {
    /// Number of figure blocks rewritten.
    #[must_use]
    pub fn count(&self) -> usize {
        self.figures.len()
    }
}

/// Converts figure blocks in Markdown text to HTML figures.
///
/// # Example
///
/// ```
/// use figuremark::FigureProcessor;
///
/// let conversion = FigureProcessor::new().process("```figure Demo\n[x]{!}\n```\n");
/// assert_eq!(conversion.count(), 1);
/// assert!(conversion.text.starts_with(r#"<figure id="figure-1" class="figuremark" data-fignum="1">"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FigureProcessor {
    globals: AttributeSet,
}

impl FigureProcessor {
    /// Create a processor with empty initial globals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the global state of every document with `globals`.
    ///
    /// Global lines in a document are folded on top of these.
    #[must_use]
    pub fn with_globals(mut self, globals: AttributeSet) -> Self {
        self.globals = globals;
        self
    }

    /// Rewrite every figure block in `text`.
    #[must_use]
    pub fn process(&self, text: &str) -> Conversion {
        let mut globals = self.globals.clone();
        let mut counter = FigureCounter::new();
        let mut segments = Segments::new();
        let mut figures = Vec::new();
        let mut cursor = 0;
        let mut line = 1;

        while let Some(block) = block::find_next(text, cursor) {
            let gap = &text[cursor..block.start];
            line += count_lines(gap);

            fold_globals(gap, &mut globals, &mut segments);
            let number = counter.advance(gap);
            let (html, metadata) = render(&block, number, &globals, line);

            tracing::debug!(
                number,
                id = %metadata.id,
                line,
                "Rewrote figure block"
            );

            segments.replace(html);
            figures.push(metadata);
            line += count_lines(block.source);
            cursor = block.end;
        }
        segments.keep(&text[cursor..]);

        Conversion {
            text: segments.finish(),
            figures,
        }
    }
}

/// Rewrite `text` with a default processor.
///
/// # Example
///
/// ```
/// assert_eq!(figuremark::convert("No figures here.\n"), "No figures here.\n");
/// ```
#[must_use]
pub fn convert(text: &str) -> String {
    FigureProcessor::new().process(text).text
}

fn render(
    block: &FigureBlock<'_>,
    number: usize,
    globals: &AttributeSet,
    line: usize,
) -> (String, FigureMetadata) {
    let content = format!(
        r#"<div class="figure-content">{}</div>"#,
        annotate(block.body)
    );

    let mut attrs = AttributeSet::parse(block.attributes.unwrap_or_default());
    let id = attrs
        .id
        .get_or_insert_with(|| format!("figure-{number}"))
        .clone();
    attrs
        .attributes
        .insert(FIGNUM_ATTRIBUTE.to_owned(), number.to_string());
    attrs.apply_fallback(globals);

    let directives = Directives::resolve(&attrs);
    let caption = caption::compose_with(&directives, number, block.title, Some(&id));
    let inner = caption::place(content, caption, directives.caption_before);
    let figure = format!("<figure{attrs}>{inner}</figure>");

    let metadata = FigureMetadata {
        number,
        id,
        title: block.title.to_owned(),
        line,
    };
    (
        retain(directives.retain_block, block.source, figure),
        metadata,
    )
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn process(text: &str) -> Conversion {
        FigureProcessor::new().process(text)
    }

    #[test]
    fn test_no_blocks_unchanged() {
        let text = "# Title\n\n```rust\nfn main() {}\n```\n\n{figure .a} inline\n";
        let conversion = process(text);
        assert_eq!(conversion.text, text);
        assert_eq!(conversion.count(), 0);
    }

    #[test]
    fn test_trailing_globals_without_block_kept() {
        let text = "Text\n{figure .a}\n";
        assert_eq!(process(text).text, text);
    }

    #[test]
    fn test_simple_block() {
        let text = "Intro\n\n```figure Overview\nHello [world]{!}\n```\n\nOutro\n";
        assert_eq!(
            process(text).text,
            concat!(
                "Intro\n\n",
                r#"<figure id="figure-1" class="figuremark" data-fignum="1">"#,
                r##"<figcaption><span class="figure-number"><a href="#figure-1">Fig. 1</a></span><span class="figure-title">Overview</span></figcaption>"##,
                "\n",
                r#"<div class="figure-content">Hello <span class="figuremark highlight">world</span></div>"#,
                "</figure>",
                "\n\nOutro\n"
            )
        );
    }

    #[test]
    fn test_local_id_and_attributes() {
        let text = "```figuremark Chart {#sales .wide data-src=q3 :link-caption=none}\nx\n```";
        let conversion = process(text);
        assert_eq!(
            conversion.text,
            concat!(
                r#"<figure id="sales" class="figuremark wide" data-fignum="1" data-src="q3">"#,
                r#"<figcaption><span class="figure-number">Fig. 1</span><span class="figure-title">Chart</span></figcaption>"#,
                "\n",
                r#"<div class="figure-content">x</div></figure>"#
            )
        );
        assert_eq!(conversion.figures[0].id, "sales");
    }

    #[test]
    fn test_caption_after_and_omitted() {
        let text = "```figure T {:caption-before=false :link-caption=none}\nx\n```\n\n```figure {:empty-captions=false}\ny\n```";
        let output = process(text).text;
        assert!(output.contains(
            r#"<div class="figure-content">x</div>
<figcaption><span class="figure-number">Fig. 1</span><span class="figure-title">T</span></figcaption></figure>"#
        ));
        assert!(output.contains(
            r#"<figure id="figure-2" class="figuremark" data-fignum="2"><div class="figure-content">y</div></figure>"#
        ));
    }

    #[test]
    fn test_numbering_counts_external_figures() {
        let text = concat!(
            "```figure A\na\n```\n",
            "<figure><img src=\"x.png\"></figure>\n",
            "<figure>\n<p>y</p>\n</figure>\n",
            "```figure B\nb\n```\n",
            "```figure C\nc\n```\n",
        );
        let numbers: Vec<usize> = process(text).figures.iter().map(|f| f.number).collect();
        assert_eq!(numbers, [1, 4, 5]);
    }

    #[test]
    fn test_external_figures_after_last_block_not_counted() {
        let conversion = process("```figure\na\n```\n<figure>x</figure>\n");
        assert_eq!(conversion.figures[0].number, 1);
    }

    #[test]
    fn test_globals_removed_and_applied() {
        let text = "{figure .dark :link-caption=none}\nIntro\n```figure\na\n```\n";
        let output = process(text).text;
        assert!(output.starts_with("\nIntro\n<figure id=\"figure-1\" class=\"figuremark dark\""));
        assert!(!output.contains("{figure"));
        assert!(output.contains(r#"<span class="figure-number">Fig. 1</span>"#));
    }

    #[test]
    fn test_globals_persist_and_update() {
        let text = concat!(
            "{figure .a :fig-num-format=\"Figure #\"}\n",
            "```figure\n1\n```\n",
            "{figure .-:a .b}\n",
            "```figure\n2\n```\n",
        );
        let output = process(text).text;
        assert!(output.contains(r#"<figure id="figure-1" class="figuremark a" data-fignum="1">"#));
        assert!(output.contains(r#"<figure id="figure-2" class="figuremark b" data-fignum="2">"#));
        assert!(output.contains(r##"<a href="#figure-2">Figure 2</a>"##));
    }

    #[test]
    fn test_local_values_win_over_globals() {
        let text = "{figure #shared data-x=global :link-caption=all}\n```figure {data-x=local :link-caption=none}\na\n```";
        let output = process(text).text;
        assert!(output.contains(r#"<figure id="figure-1" class="figuremark" data-fignum="1" data-x="local">"#));
        assert!(!output.contains("<a href="));
    }

    #[test]
    fn test_local_removals_do_not_touch_globals() {
        let text = "{figure .dark}\n```figure {.-:dark}\na\n```";
        let output = process(text).text;
        assert!(output.contains(r#"class="figuremark dark""#));
    }

    #[test]
    fn test_retain_comment_is_idempotent() {
        let text = "```figure T {:retain-block=comment}\nbody\n```\n";
        let once = process(text);
        assert!(once.text.starts_with("<!--\n```figure T {:retain-block=comment}\nbody\n```\n-->\n\n<figure "));
        let twice = process(&once.text);
        assert_eq!(twice.count(), 0);
        assert_eq!(twice.text, once.text);
    }

    #[test]
    fn test_retain_indent() {
        let text = "```figure T {:retain-block=indent}\nbody\n```";
        let output = process(text).text;
        assert!(output.starts_with("\t```figure T {:retain-block=indent}\n\tbody\n\t```\n\n<figure "));
        assert_eq!(process(&output).count(), 0);
    }

    #[test]
    fn test_output_has_no_blocks() {
        let text = "```figure A\n[a]{+}\n```\n\n~~~~figuremark B {.x}\n{1} b\n~~~~\n";
        let once = process(text);
        assert_eq!(once.count(), 2);
        assert_eq!(process(&once.text).text, once.text);
    }

    #[test]
    fn test_commented_block_untouched() {
        let text = "<!--\n```figure\na\n```\n-->\n";
        assert_eq!(process(text).text, text);
    }

    #[test]
    fn test_unclosed_block_untouched() {
        let text = "```figure\nnever closed\n";
        assert_eq!(process(text).text, text);
    }

    #[test]
    fn test_metadata_lines() {
        let text = "a\nb\n```figure One\nx\n```\n\n```figure Two\ny\nz\n```\n";
        let figures = process(text).figures;
        assert_eq!(
            figures,
            [
                FigureMetadata {
                    number: 1,
                    id: "figure-1".to_owned(),
                    title: "One".to_owned(),
                    line: 3,
                },
                FigureMetadata {
                    number: 2,
                    id: "figure-2".to_owned(),
                    title: "Two".to_owned(),
                    line: 7,
                },
            ]
        );
    }

    #[test]
    fn test_seeded_globals() {
        let processor =
            FigureProcessor::new().with_globals(AttributeSet::parse(":caption-before=false"));
        let output = processor.process("```figure T\nx\n```").text;
        assert!(output.contains("</div>\n<figcaption>"));
    }

    #[test]
    fn test_convert_helper() {
        assert_eq!(convert("plain"), "plain");
    }
}
