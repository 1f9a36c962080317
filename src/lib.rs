// Re-export modules
pub mod config;
pub mod drivers;
pub mod error;
pub mod parsers;
pub mod results;
pub mod rfp;
pub mod scrape;
pub mod urls;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{BrowserKind, ScraperConfig};
pub use error::ScrapeError;
pub use results::{ScrapeResult, ScrapeStatus};
pub use scrape::{scrape_page, scrape_url};

use std::path::{Path, PathBuf};

/// Builder for a single page scrape
pub struct PageScraper {
    url: String,
    config: ScraperConfig,
}

impl PageScraper {
    /// Create a new builder for the given URL with default settings
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            config: ScraperConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, config::ConfigError> {
        let config = ScraperConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    /// Set the browser the WebDriver server should launch
    pub fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.config.browser = browser;
        self
    }

    /// Set the navigation timeout (page load plus network idle)
    pub fn with_navigation_timeout(mut self, timeout_ms: u64) -> Self {
        self.config.navigation_timeout_ms = timeout_ms;
        self
    }

    /// Set the delay applied after the page went idle
    pub fn with_settle_delay(mut self, delay_ms: u64) -> Self {
        self.config.settle_delay_ms = delay_ms;
        self
    }

    /// Set the directory screenshots are written to
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.screenshot_dir = dir.into();
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run the scrape
    pub async fn scrape(self) -> ScrapeResult {
        scrape_url(&self.url, &self.config).await
    }
}
