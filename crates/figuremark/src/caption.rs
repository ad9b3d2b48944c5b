//! Figure caption markup.

use crate::attrs::AttributeSet;
use crate::directives::{Directives, LinkCaption};

/// Build the `<figcaption>` for a figure.
///
/// Returns `None` when the title is empty and `empty-captions` is not
/// `true`. The link targets the figure id from `attrs`.
///
/// # Example
///
/// ```
/// use figuremark::{compose, AttributeSet};
///
/// let mut attrs = AttributeSet::parse(":link-caption=all");
/// attrs.id = Some("figure-2".to_owned());
/// assert_eq!(
///     compose(2, "Result", &attrs).as_deref(),
///     Some(r##"<figcaption><a href="#figure-2"><span class="figure-number">Fig. 2</span><span class="figure-title">Result</span></a></figcaption>"##)
/// );
/// ```
#[must_use]
pub fn compose(number: usize, title: &str, attrs: &AttributeSet) -> Option<String> {
    compose_with(&Directives::resolve(attrs), number, title, attrs.id.as_deref())
}

pub(crate) fn compose_with(
    directives: &Directives,
    number: usize,
    title: &str,
    id: Option<&str>,
) -> Option<String> {
    if title.is_empty() && !directives.empty_captions {
        return None;
    }

    let label = directives.label(number);
    let link = format!(r##"<a href="#{}">"##, id.unwrap_or_default());

    let caption = match directives.link_caption {
        LinkCaption::Number => format!(
            r#"<figcaption><span class="figure-number">{link}{label}</a></span><span class="figure-title">{title}</span></figcaption>"#
        ),
        LinkCaption::Title => format!(
            r#"<figcaption><span class="figure-number">{label}</span><span class="figure-title">{link}{title}</a></span></figcaption>"#
        ),
        LinkCaption::All => format!(
            r#"<figcaption>{link}<span class="figure-number">{label}</span><span class="figure-title">{title}</span></a></figcaption>"#
        ),
        LinkCaption::None => format!(
            r#"<figcaption><span class="figure-number">{label}</span><span class="figure-title">{title}</span></figcaption>"#
        ),
    };
    Some(caption)
}

/// Place a caption before or after the figure content.
pub(crate) fn place(content: String, caption: Option<String>, before: bool) -> String {
    match caption {
        None => content,
        Some(caption) if before => format!("{caption}\n{content}"),
        Some(caption) => format!("{content}\n{caption}"),
    }
}
