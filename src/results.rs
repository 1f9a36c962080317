use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of a scrape invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Success,
    Error,
}

/// Structured content extracted from a single rendered page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// URL that was requested
    pub url: String,

    /// URL the browser ended up on after redirects
    pub final_url: Option<String>,

    /// Document title
    pub title: Option<String>,

    pub status: ScrapeStatus,

    pub content: PageContent,

    /// Meta tags keyed by name, property or http-equiv
    pub meta: BTreeMap<String, String>,

    /// Where the screenshot was written
    pub screenshot: Option<PathBuf>,

    pub statistics: Statistics,

    /// Failure message, set only when status is error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Build a failed result; content, meta and statistics stay present but empty
    pub fn failed(url: &str, error: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            final_url: None,
            title: None,
            status: ScrapeStatus::Error,
            content: PageContent::default(),
            meta: BTreeMap::new(),
            screenshot: None,
            statistics: Statistics::default(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ScrapeStatus::Success
    }
}

/// The six content categories of a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub text: TextContent,
    pub links: Vec<Link>,
    pub forms: Vec<Form>,
    pub images: Vec<Image>,
    pub tables: Vec<Table>,
    pub navigation: Vec<Navigation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// All visible text with whitespace runs collapsed
    pub full_text: String,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub lists: Vec<List>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 through 6
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    #[serde(rename = "type")]
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    /// The href exactly as authored
    pub href: String,
    pub absolute_url: String,
    pub is_external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub action: String,
    /// Uppercased, GET when absent
    pub method: String,
    pub inputs: Vec<FormInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub placeholder: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub absolute_url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count including the header row
    pub total_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    /// A `<nav>` element
    Nav,
    /// A list styled as a menu, nav bar or breadcrumb trail
    Menu,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    #[serde(rename = "type")]
    pub kind: NavigationKind,
    pub links: Vec<NavigationLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLink {
    pub text: String,
    pub href: String,
}

/// Counts derived from the extracted content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_links: usize,
    pub total_forms: usize,
    pub total_images: usize,
    pub total_tables: usize,
    /// Character count of the full text
    pub text_length: usize,
}

impl Statistics {
    pub fn from_content(content: &PageContent) -> Self {
        Self {
            total_links: content.links.len(),
            total_forms: content.forms.len(),
            total_images: content.images.len(),
            total_tables: content.tables.len(),
            text_length: content.text.full_text.chars().count(),
        }
    }
}
