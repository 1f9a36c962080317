use crate::error::ScrapeError;
use crate::parsers::{selector, trimmed_text};
use scraper::Html;
use std::collections::BTreeMap;

/// Attributes naming a meta tag, in lookup order
const META_KEY_ATTRS: [&str; 3] = ["name", "property", "http-equiv"];

/// Collects meta tags keyed by name, property or http-equiv.
///
/// A later tag with the same key replaces an earlier one. The document
/// `<title>` is stored under `title`.
pub fn extract_meta(doc: &Html) -> Result<BTreeMap<String, String>, ScrapeError> {
    let meta_selector = selector("meta")?;
    let title_selector = selector("title")?;

    let mut meta = BTreeMap::new();
    for tag in doc.select(&meta_selector) {
        let element = tag.value();
        let key = META_KEY_ATTRS
            .iter()
            .find_map(|attr| element.attr(attr).filter(|v| !v.is_empty()));
        let content = element.attr("content").filter(|v| !v.is_empty());

        if let (Some(key), Some(content)) = (key, content) {
            meta.insert(key.to_string(), content.to_string());
        }
    }

    if let Some(title) = doc.select(&title_selector).next() {
        meta.insert("title".to_string(), trimmed_text(title));
    }

    Ok(meta)
}
