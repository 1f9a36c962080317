use crate::error::ScrapeError;
use crate::parsers::{selector, trimmed_text, visible_text};
use crate::results::{Heading, List, ListKind, TextContent};
use scraper::{ElementRef, Html};

/// Collapse every whitespace run to a single space and trim the ends.
///
/// Applying it twice yields the same string as applying it once.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts full text, headings, paragraphs and lists from a document
pub fn extract_text_content(doc: &Html) -> Result<TextContent, ScrapeError> {
    let full_text = normalize_whitespace(&visible_text(doc.root_element()));

    Ok(TextContent {
        full_text,
        headings: extract_headings(doc)?,
        paragraphs: extract_paragraphs(doc)?,
        lists: extract_lists(doc)?,
    })
}

/// Headings h1 through h6, in document order
pub fn extract_headings(doc: &Html) -> Result<Vec<Heading>, ScrapeError> {
    let heading_selector = selector("h1, h2, h3, h4, h5, h6")?;

    let headings = doc
        .select(&heading_selector)
        .filter_map(|heading| {
            let level = heading
                .value()
                .name()
                .strip_prefix('h')
                .and_then(|level| level.parse::<u8>().ok())?;
            Some(Heading {
                level,
                text: trimmed_text(heading),
            })
        })
        .collect();

    Ok(headings)
}

/// Paragraph text, skipping paragraphs that are empty once trimmed
pub fn extract_paragraphs(doc: &Html) -> Result<Vec<String>, ScrapeError> {
    let paragraph_selector = selector("p")?;

    Ok(doc
        .select(&paragraph_selector)
        .map(trimmed_text)
        .filter(|text| !text.is_empty())
        .collect())
}

/// Every `<ul>` and `<ol>` with the text of its direct `<li>` children.
///
/// Empty items are kept so item positions line up with the markup.
pub fn extract_lists(doc: &Html) -> Result<Vec<List>, ScrapeError> {
    let list_selector = selector("ul, ol")?;

    let lists = doc
        .select(&list_selector)
        .map(|list| {
            let kind = if list.value().name() == "ol" {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            List {
                kind,
                items: list_items(list),
            }
        })
        .collect();

    Ok(lists)
}

fn list_items(list: ElementRef<'_>) -> Vec<String> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(trimmed_text)
        .collect()
}
