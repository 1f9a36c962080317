use crate::error::ScrapeError;
use crate::parsers::{selector, trimmed_text};
use crate::results::{Navigation, NavigationKind, NavigationLink};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Class names that mark a list as site navigation
const MENU_CLASS_PATTERN: &str = r"(?i)nav|menu|breadcrumb";

/// Extracts navigation blocks.
///
/// `<nav>` elements come first, then `<ul>`/`<ol>` lists whose class looks
/// like a nav bar, menu or breadcrumb trail. A list inside a `<nav>` shows up
/// in both passes. Blocks without links are dropped.
pub fn extract_navigation(doc: &Html) -> Result<Vec<Navigation>, ScrapeError> {
    let nav_selector = selector("nav")?;
    let list_selector = selector("ul, ol")?;
    let link_selector = selector("a[href]")?;
    let menu_class = Regex::new(MENU_CLASS_PATTERN)
        .map_err(|e| ScrapeError::Extraction(format!("invalid menu pattern: {e}")))?;

    let mut blocks = Vec::new();

    for nav in doc.select(&nav_selector) {
        push_block(&mut blocks, NavigationKind::Nav, nav, &link_selector);
    }

    for list in doc.select(&list_selector) {
        let is_menu = list
            .value()
            .attr("class")
            .is_some_and(|class| menu_class.is_match(class));
        if is_menu {
            push_block(&mut blocks, NavigationKind::Menu, list, &link_selector);
        }
    }

    Ok(blocks)
}

fn push_block(
    blocks: &mut Vec<Navigation>,
    kind: NavigationKind,
    element: ElementRef<'_>,
    link_selector: &Selector,
) {
    let links = element
        .select(link_selector)
        .filter_map(|anchor| {
            Some(NavigationLink {
                text: trimmed_text(anchor),
                href: anchor.value().attr("href")?.to_string(),
            })
        })
        .collect::<Vec<_>>();

    if !links.is_empty() {
        blocks.push(Navigation { kind, links });
    }
}
