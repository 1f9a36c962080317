use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading a scraper configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Browser the WebDriver server should launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Firefox,
    Chrome,
}

/// Configuration for a single page scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Browser to request from the WebDriver server
    #[serde(default)]
    pub browser: BrowserKind,

    /// Whether to run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound for loading the page and waiting for network idle
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Extra wait after the page went idle, for client-side rendering
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// How long the network must stay quiet to count as idle
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Directory screenshots are written to
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,

    /// Grow the window to the document size before capturing
    #[serde(default = "default_full_page_screenshot")]
    pub full_page_screenshot: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            browser: BrowserKind::default(),
            headless: default_headless(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            network_idle_ms: default_network_idle_ms(),
            screenshot_dir: default_screenshot_dir(),
            full_page_screenshot: default_full_page_screenshot(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

/// Default value for navigation_timeout_ms (30 seconds)
fn default_navigation_timeout_ms() -> u64 {
    30_000
}

/// Default value for settle_delay_ms (2 seconds)
fn default_settle_delay_ms() -> u64 {
    2_000
}

fn default_network_idle_ms() -> u64 {
    500
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_full_page_screenshot() -> bool {
    true
}
