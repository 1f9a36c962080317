use crate::error::ScrapeError;
use crate::parsers::{selector, trimmed_text};
use crate::results::{Image, Link};
use crate::urls::{is_external, resolve_url};
use scraper::Html;
use url::Url;

/// Extracts every `<a>` carrying an href, resolved against the page URL
pub fn extract_links(doc: &Html, base: &Url) -> Result<Vec<Link>, ScrapeError> {
    let link_selector = selector("a[href]")?;

    let links = doc
        .select(&link_selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let absolute_url = resolve_url(base, href);
            Some(Link {
                text: trimmed_text(anchor),
                href: href.to_string(),
                is_external: is_external(base, &absolute_url),
                absolute_url,
            })
        })
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).map(|l| &l.absolute_url).collect::<Vec<_>>()
        );
    }

    Ok(links)
}

/// Extracts every `<img>` with a non-empty src
pub fn extract_images(doc: &Html, base: &Url) -> Result<Vec<Image>, ScrapeError> {
    let image_selector = selector("img")?;

    Ok(doc
        .select(&image_selector)
        .filter_map(|img| {
            let src = img.value().attr("src").filter(|src| !src.is_empty())?;
            Some(Image {
                src: src.to_string(),
                absolute_url: resolve_url(base, src),
                alt: img.value().attr("alt").unwrap_or_default().to_string(),
            })
        })
        .collect())
}
