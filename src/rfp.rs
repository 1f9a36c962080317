//! RFP (request for proposal) reader layered on the page scraper.
//!
//! Only basic extraction is done: the title and a preview of the page text.
//! Due dates, requirements, budgets and the other procurement fields are left
//! empty; no language model is consulted.

use crate::config::ScraperConfig;
use crate::results::{Form, Link, ScrapeResult, Table, TextContent};
use crate::scrape::scrape_url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Characters of page text kept as the scope-of-work preview
const SCOPE_PREVIEW_CHARS: usize = 500;

/// Document formats an RFP may arrive in
pub const SUPPORTED_FORMATS: [&str; 3] = ["pdf", "html", "docx"];

/// Where an RFP comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RfpSource {
    Webpage(String),
    File(PathBuf),
}

impl RfpSource {
    /// URLs with an http or https scheme are webpages, anything else a file path
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            RfpSource::Webpage(source.to_string())
        } else {
            RfpSource::File(PathBuf::from(source))
        }
    }
}

/// The parts of a scrape an RFP analysis works from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfpScrapedContent {
    pub source_type: String,
    pub url: String,
    pub title: String,
    pub text_content: TextContent,
    pub links: Vec<Link>,
    pub forms: Vec<Form>,
    pub tables: Vec<Table>,
    pub meta: BTreeMap<String, String>,
    pub screenshot: Option<PathBuf>,
}

impl RfpScrapedContent {
    pub fn from_scrape(result: &ScrapeResult) -> Self {
        Self {
            source_type: "webpage".to_string(),
            url: result.url.clone(),
            title: result.title.clone().unwrap_or_default(),
            text_content: result.content.text.clone(),
            links: result.content.links.clone(),
            forms: result.content.forms.clone(),
            tables: result.content.tables.clone(),
            meta: result.meta.clone(),
            screenshot: result.screenshot.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionLevel {
    /// Fields copied from the scrape, nothing inferred
    BasicExtraction,
}

/// Structured RFP fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfpFields {
    pub title: String,
    pub due_date: Option<String>,
    pub scope_of_work: String,
    pub requirements: Vec<String>,
    pub eligibility: Vec<String>,
    pub third_party_needs: Vec<String>,
    pub contact_info: BTreeMap<String, String>,
    pub budget_range: Option<String>,
    pub timeline: Vec<String>,
    pub status: ExtractionLevel,
}

impl RfpFields {
    pub fn from_scraped(scraped: &RfpScrapedContent) -> Self {
        Self {
            title: scraped.title.clone(),
            due_date: None,
            scope_of_work: scope_preview(&scraped.text_content.full_text),
            requirements: Vec::new(),
            eligibility: Vec::new(),
            third_party_needs: Vec::new(),
            contact_info: BTreeMap::new(),
            budget_range: None,
            timeline: Vec::new(),
            status: ExtractionLevel::BasicExtraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

/// Result of analysing one RFP source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfpAnalysis {
    pub status: AnalysisStatus,
    pub agent: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RfpFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_scraped: Option<RfpScrapedContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RfpAnalysis {
    fn failed(source: &str, error: impl ToString) -> Self {
        Self {
            status: AnalysisStatus::Error,
            agent: RfpReader::AGENT.to_string(),
            source: source.to_string(),
            data: None,
            raw_scraped: None,
            error: Some(error.to_string()),
        }
    }

    /// Analysis of an already finished scrape
    pub fn from_scrape(source: &str, result: &ScrapeResult) -> Self {
        if !result.is_success() {
            let message = result.error.as_deref().unwrap_or("scrape failed");
            return Self::failed(source, message);
        }

        let scraped = RfpScrapedContent::from_scrape(result);
        Self {
            status: AnalysisStatus::Success,
            agent: RfpReader::AGENT.to_string(),
            source: source.to_string(),
            data: Some(RfpFields::from_scraped(&scraped)),
            raw_scraped: Some(scraped),
            error: None,
        }
    }
}

/// Reads RFP documents through the page scraper
pub struct RfpReader {
    config: ScraperConfig,
}

impl RfpReader {
    const AGENT: &'static str = "rfp_reader";

    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    pub async fn analyze(&self, source: &str) -> RfpAnalysis {
        ::log::info!("Starting RFP analysis: {}", source);

        match RfpSource::parse(source) {
            RfpSource::Webpage(url) => {
                let result = scrape_url(&url, &self.config).await;
                let analysis = RfpAnalysis::from_scrape(source, &result);
                if let Some(error) = &analysis.error {
                    ::log::error!("RFP analysis failed: {}", error);
                }
                analysis
            }
            RfpSource::File(path) => {
                let message = unsupported_file_message(&path);
                ::log::error!("RFP analysis failed: {}", message);
                RfpAnalysis::failed(source, message)
            }
        }
    }
}

fn unsupported_file_message(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if SUPPORTED_FORMATS.contains(&extension.as_str()) {
        format!("parsing uploaded {extension} files is not supported yet: {}", path.display())
    } else {
        format!("unsupported RFP source: {}", path.display())
    }
}

/// First characters of the page text followed by an ellipsis
fn scope_preview(text: &str) -> String {
    let mut preview: String = text.chars().take(SCOPE_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
