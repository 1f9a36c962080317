pub mod forms;
pub mod html;
pub mod meta;
pub mod navigation;
pub mod tables;
pub mod text;


use crate::error::ScrapeError;
use crate::results::PageContent;
use forms::FormSnapshot;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Everything the extractor derives from one rendered document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    pub content: PageContent,
    pub meta: BTreeMap<String, String>,
}

/// Parse rendered HTML into the content categories.
///
/// `forms` are attribute snapshots taken through live element handles; the
/// markup itself is not consulted for forms.
pub fn parse(html: &str, base: &Url, forms: Vec<FormSnapshot>) -> Result<ExtractedPage, ScrapeError> {
    let doc = Html::parse_document(html);

    let text = text::extract_text_content(&doc)?;
    let links = html::extract_links(&doc, base)?;
    let images = html::extract_images(&doc, base)?;
    let tables = tables::extract_tables(&doc)?;
    let navigation = navigation::extract_navigation(&doc)?;
    let meta = meta::extract_meta(&doc)?;
    let forms = forms::extract_forms(forms);

    ::log::debug!(
        "Extracted {} links, {} forms, {} images, {} tables, {} navigation blocks",
        links.len(),
        forms.len(),
        images.len(),
        tables.len(),
        navigation.len()
    );

    Ok(ExtractedPage {
        content: PageContent {
            text,
            links,
            forms,
            images,
            tables,
            navigation,
        },
        meta,
    })
}

/// Parse HTML without a browser, reading forms from the static markup
pub fn parse_static(html: &str, base: &Url) -> Result<ExtractedPage, ScrapeError> {
    let doc = Html::parse_document(html);
    let forms = forms::snapshot_forms(&doc)?;
    parse(html, base, forms)
}

/// Compile a CSS selector, reporting failures as extraction errors
pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Extraction(format!("invalid selector {css:?}: {e}")))
}

/// Text of an element, leaving out anything inside `<script>` or `<style>`
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        if let Node::Text(chunk) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(e) if matches!(e.name(), "script" | "style"))
            });
            if !hidden {
                text.push_str(chunk);
            }
        }
    }
    text
}

/// Trimmed visible text of an element
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    visible_text(element).trim().to_string()
}
