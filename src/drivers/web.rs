use crate::config::{BrowserKind, ScraperConfig};
use crate::drivers::PageDriver;
use crate::error::ScrapeError;
use crate::parsers::forms::{FIELD_SELECTOR, FieldSnapshot, FormSnapshot};
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::Instant;

/// Ports WebDriver servers commonly listen on, tried when the configured one fails
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:4444", // geckodriver default
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// How often resource activity is sampled while waiting for idle
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Entries kept by the Resource Timing buffer; browsers default to 250
const RESOURCE_BUFFER_SIZE: u32 = 100_000;

/// Installs fetch/XHR in-flight counters on first call, then reports activity
const NETWORK_ACTIVITY_SCRIPT: &str = r#"
const bufferSize = arguments[0];
if (!window.__harvestNet) {
  const net = { pending: 0 };
  window.__harvestNet = net;
  performance.setResourceTimingBufferSize(bufferSize);
  performance.addEventListener('resourcetimingbufferfull', () => {
    net.overflow = (net.overflow || 0) + performance.getEntriesByType('resource').length;
    performance.clearResourceTimings();
  });
  if (window.fetch) {
    const fetch = window.fetch;
    window.fetch = function (...args) {
      net.pending++;
      return fetch.apply(this, args).finally(() => { net.pending--; });
    };
  }
  const send = XMLHttpRequest.prototype.send;
  XMLHttpRequest.prototype.send = function (...args) {
    net.pending++;
    this.addEventListener('loadend', () => { net.pending--; }, { once: true });
    return send.apply(this, args);
  };
}
const net = window.__harvestNet;
return {
  resources: (net.overflow || 0) + performance.getEntriesByType('resource').length,
  pending: net.pending,
  ready: document.readyState === 'complete',
};
"#;

const DOCUMENT_SIZE_SCRIPT: &str = "const d = document.documentElement, b = document.body || d; \
     return [Math.max(d.scrollWidth, b.scrollWidth), Math.max(d.scrollHeight, b.scrollHeight)];";

/// Largest window edge requested for full-page captures
const MAX_WINDOW_EDGE: u32 = 16_384;

/// A headless browser session behind a WebDriver server
pub struct WebDriverSession {
    client: Client,
    network_idle: Duration,
    full_page_screenshot: bool,
}

impl WebDriverSession {
    /// Start a new browser session with one window
    pub async fn open(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = connect_to_webdriver(config).await?;

        let timeouts = TimeoutConfiguration::new(None, Some(config.navigation_timeout()), None);
        if let Err(e) = client.update_timeouts(timeouts).await {
            ::log::warn!("Could not set page load timeout: {}", e);
        }

        Ok(Self {
            client,
            network_idle: config.network_idle(),
            full_page_screenshot: config.full_page_screenshot,
        })
    }

    /// Wait until the document has loaded and no request has started or
    /// finished for the idle interval
    async fn wait_for_network_idle(&self) -> Result<(), ScrapeError> {
        let mut last = self.network_activity().await?;
        let mut quiet_since = Instant::now();

        loop {
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;

            let activity = self.network_activity().await?;
            if activity.resources != last.resources || activity.is_busy() {
                ::log::trace!(
                    "Network busy: {} resources, {} pending, ready={}",
                    activity.resources,
                    activity.pending,
                    activity.ready
                );
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= self.network_idle {
                ::log::debug!("Network idle after {} resources", activity.resources);
                return Ok(());
            }
            last = activity;
        }
    }

    async fn network_activity(&self) -> Result<NetworkActivity, ScrapeError> {
        let value = self
            .client
            .execute(NETWORK_ACTIVITY_SCRIPT, vec![json!(RESOURCE_BUFFER_SIZE)])
            .await?;
        Ok(NetworkActivity::from_value(value))
    }

    /// Resize the window to the scrollable document size
    async fn expand_to_document(&self) -> Result<(), ScrapeError> {
        let value = self.client.execute(DOCUMENT_SIZE_SCRIPT, Vec::new()).await?;
        let (width, height) = match parse_size(&value) {
            Some(size) => size,
            None => {
                ::log::warn!("Unexpected document size {}, capturing viewport only", value);
                return Ok(());
            }
        };

        ::log::debug!("Resizing window to {}x{} for full-page capture", width, height);
        self.client.set_window_size(width, height).await?;
        Ok(())
    }
}

impl PageDriver for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        ::log::debug!("Navigating to {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        self.wait_for_network_idle().await
    }

    async fn current_url(&self) -> Result<String, ScrapeError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn title(&self) -> Result<String, ScrapeError> {
        Ok(self.client.title().await?)
    }

    async fn rendered_html(&self) -> Result<String, ScrapeError> {
        Ok(self.client.source().await?)
    }

    async fn form_snapshots(&self) -> Result<Vec<FormSnapshot>, ScrapeError> {
        let mut snapshots = Vec::new();

        for form in self.client.find_all(Locator::Css("form")).await? {
            let mut fields = Vec::new();
            for field in form.find_all(Locator::Css(FIELD_SELECTOR)).await? {
                fields.push(FieldSnapshot {
                    kind: field.attr("type").await?,
                    name: field.attr("name").await?,
                    placeholder: field.attr("placeholder").await?,
                    required: field.attr("required").await?.is_some(),
                });
            }

            snapshots.push(FormSnapshot {
                action: form.attr("action").await?,
                method: form.attr("method").await?,
                fields,
            });
        }

        ::log::debug!("Read {} forms from the live DOM", snapshots.len());
        Ok(snapshots)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScrapeError> {
        if self.full_page_screenshot {
            if let Err(e) = self.expand_to_document().await {
                ::log::warn!("Full-page resize failed, capturing viewport only: {}", e);
            }
        }

        self.client
            .screenshot()
            .await
            .map_err(|e| ScrapeError::Screenshot(e.to_string()))
    }

    async fn close(self) -> Result<(), ScrapeError> {
        self.client
            .close()
            .await
            .map_err(|e| ScrapeError::Teardown(e.to_string()))?;
        ::log::debug!("WebDriver session closed");
        Ok(())
    }
}

/// One sample of the page's network state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct NetworkActivity {
    /// Completed resource fetches since the page loaded
    resources: u64,
    /// fetch/XHR requests started but not finished
    pending: i64,
    ready: bool,
}

impl NetworkActivity {
    /// An unreadable sample is treated as busy
    fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            ::log::warn!("Unexpected network activity sample: {}", e);
            Self::default()
        })
    }

    fn is_busy(&self) -> bool {
        !self.ready || self.pending > 0
    }
}

/// Capabilities requesting the configured browser, headless when asked
pub fn capabilities(config: &ScraperConfig) -> Capabilities {
    let mut caps = Capabilities::new();

    match config.browser {
        BrowserKind::Firefox => {
            let args: Vec<&str> = if config.headless { vec!["-headless"] } else { Vec::new() };
            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
        BrowserKind::Chrome => {
            let mut args = vec!["--disable-gpu", "--no-sandbox"];
            if config.headless {
                args.insert(0, "--headless=new");
            }
            caps.insert("browserName".to_string(), json!("chrome"));
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
    }

    caps
}

/// Connects to the configured WebDriver, falling back to common local ports
async fn connect_to_webdriver(config: &ScraperConfig) -> Result<Client, ScrapeError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config));

    let mut last_error = match builder.connect(&config.webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        match builder.connect(url).await {
            Ok(client) => {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScrapeError::Session(last_error))
}

fn parse_size(value: &Value) -> Option<(u32, u32)> {
    let dims = value.as_array()?;
    let edge = |v: &Value| {
        v.as_u64()
            .or_else(|| v.as_f64().map(|f| f as u64))
            .map(|n| n.clamp(1, u64::from(MAX_WINDOW_EDGE)) as u32)
    };
    Some((edge(dims.first()?)?, edge(dims.get(1)?)?))
}
