//! Reduce an article page to a short plain-text summary.
//!
//! The article body lives in `div#mw-content-text`. Of its first
//! `paragraph_limit` `<p>` elements (document order, counted before any
//! filtering), those that are blank or sit inside an infobox table are
//! dropped; the rest are joined with single spaces and citation markers
//! such as `[1]` or `[citation needed]` are removed.
//!
//! `scraper::Html` is `!Send`, so everything here is synchronous and the
//! parsed document never outlives the call.

use crate::error::LookupError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const CONTENT_CONTAINER: &str = "div#mw-content-text";
const INFOBOX_CLASS: &str = "infobox";

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("citation pattern compiles"));

fn selector(css: &str) -> Result<Selector, LookupError> {
    Selector::parse(css).map_err(|e| LookupError::Parse(format!("bad selector {css:?}: {e:?}")))
}

/// Extract the summary text from a full article page.
///
/// Returns an empty string when no eligible paragraph has content; fails
/// with [`LookupError::Parse`] only when the content container is missing.
///
/// Each paragraph's text is trimmed before the join and the final string is
/// trimmed again, so the output is not the literal join of raw paragraph
/// text: `<p>Alpha\n</p><p>Beta\n</p>` gives `"Alpha Beta"`, not
/// `"Alpha\n Beta\n"`. Whitespace inside a paragraph, including the double
/// space a stripped `[1]` can leave, is kept.
///
/// ```
/// let html = r#"<div id="mw-content-text"><p>Cats purr.[1]</p></div>"#;
/// assert_eq!(lim_wiki::extract::extract_summary(html, 5).unwrap(), "Cats purr.");
/// ```
pub fn extract_summary(html: &str, paragraph_limit: usize) -> Result<String, LookupError> {
    let doc = Html::parse_document(html);
    let container_sel = selector(CONTENT_CONTAINER)?;
    let paragraph_sel = selector("p")?;

    let container = doc.select(&container_sel).next().ok_or_else(|| {
        LookupError::Parse(format!("content container `{CONTENT_CONTAINER}` not found"))
    })?;

    let parts: Vec<String> = container
        .select(&paragraph_sel)
        .take(paragraph_limit)
        .filter(|p| !inside_infobox(p))
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    tracing::trace!(kept = parts.len(), limit = paragraph_limit, "wiki.extract.paragraphs");

    Ok(strip_citations(&parts.join(" ")).trim().to_string())
}

/// True when any ancestor is a `<table>` carrying the infobox class.
fn inside_infobox(el: &ElementRef<'_>) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|anc| {
        let node = anc.value();
        node.name() == "table" && node.classes().any(|c| c == INFOBOX_CLASS)
    })
}

/// Remove every `[...]` run. Purely textual: unrelated bracketed text goes too.
pub fn strip_citations(text: &str) -> String {
    CITATION.replace_all(text, "").into_owned()
}
