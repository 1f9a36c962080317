use crate::config::ScraperConfig;
use crate::drivers::{PageDriver, WebDriverSession};
use crate::error::ScrapeError;
use crate::parsers;
use crate::results::{ScrapeResult, ScrapeStatus, Statistics};
use crate::utils::screenshot_file_name;
use std::path::PathBuf;
use tokio::time::timeout;
use url::Url;

/// Opens a WebDriver session, scrapes one URL and closes the session.
///
/// Never fails: every error, including a session that cannot be opened,
/// comes back as a result with status error.
pub async fn scrape_url(url: &str, config: &ScraperConfig) -> ScrapeResult {
    ::log::info!("Starting to scrape: {}", url);

    let session = match WebDriverSession::open(config).await {
        Ok(session) => session,
        Err(e) => {
            ::log::error!("Error scraping {}: {}", url, e);
            return ScrapeResult::failed(url, e);
        }
    };

    scrape_page(session, url, config).await
}

/// Scrapes one URL with a driver the caller opened, then closes it.
///
/// The driver is closed on every path, including navigation timeouts and
/// extraction failures. A failed close turns the result into an error.
pub async fn scrape_page<D: PageDriver>(driver: D, url: &str, config: &ScraperConfig) -> ScrapeResult {
    let outcome = scrape_with(&driver, url, config).await;
    let teardown = driver.close().await;

    match (outcome, teardown) {
        (Ok(result), Ok(())) => {
            ::log::info!("Successfully scraped {}", url);
            result
        }
        (Err(e), teardown) => {
            if let Err(close_error) = teardown {
                ::log::warn!("Failed to close browser session for {}: {}", url, close_error);
            }
            ::log::error!("Error scraping {} ({:?} failure): {}", url, e.kind(), e);
            ScrapeResult::failed(url, e)
        }
        (Ok(result), Err(e)) => {
            ::log::error!("Error scraping {}: {}", url, e);
            // The screenshot is already on disk
            ScrapeResult {
                screenshot: result.screenshot,
                ..ScrapeResult::failed(url, e)
            }
        }
    }
}

/// Runs the scrape pipeline against an open driver without closing it
async fn scrape_with<D: PageDriver>(
    driver: &D,
    url: &str,
    config: &ScraperConfig,
) -> Result<ScrapeResult, ScrapeError> {
    // Links and images resolve against the requested URL, not the redirect target
    let base = Url::parse(url).map_err(|source| ScrapeError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let navigation_timeout = config.navigation_timeout();
    timeout(navigation_timeout, driver.navigate(url))
        .await
        .map_err(|_| ScrapeError::NavigationTimeout {
            url: url.to_string(),
            timeout: navigation_timeout,
        })??;

    let settle_delay = config.settle_delay();
    if !settle_delay.is_zero() {
        ::log::debug!("Waiting {}ms for the page to settle", settle_delay.as_millis());
        tokio::time::sleep(settle_delay).await;
    }

    let final_url = driver.current_url().await?;
    let title = driver.title().await?;
    let html = driver.rendered_html().await?;
    let forms = driver.form_snapshots().await?;

    let page = parsers::parse(&html, &base, forms)?;

    let screenshot = save_screenshot(driver, url, config).await?;
    let statistics = Statistics::from_content(&page.content);

    Ok(ScrapeResult {
        url: url.to_string(),
        final_url: Some(final_url),
        title: Some(title),
        status: ScrapeStatus::Success,
        content: page.content,
        meta: page.meta,
        screenshot: Some(screenshot),
        statistics,
        error: None,
    })
}

/// Captures the page and writes it under the screenshot directory
async fn save_screenshot<D: PageDriver>(
    driver: &D,
    url: &str,
    config: &ScraperConfig,
) -> Result<PathBuf, ScrapeError> {
    let png = driver.screenshot().await?;

    tokio::fs::create_dir_all(&config.screenshot_dir).await?;
    let path = config.screenshot_dir.join(screenshot_file_name(url));
    tokio::fs::write(&path, &png).await?;

    ::log::debug!("Saved {} byte screenshot to {}", png.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::forms::snapshot_forms;
    use crate::parsers::forms::FormSnapshot;
    use crate::results::NavigationKind;
    use scraper::Html;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    const PAGE: &str = r#"<html><head>
        <title>Fixture</title>
        <meta name="description" content="A test page">
      </head><body>
        <nav><a href="/">Home</a><a href="https://elsewhere.org/">Out</a></nav>
        <h1>Hello</h1>
        <p>Plain   text.</p>
        <form method="post"><input name="email" required></form>
        <table><tr><th>K</th></tr><tr><td>V</td></tr></table>
      </body></html>"#;

    /// In-memory driver serving a fixed document
    struct FakeDriver {
        html: String,
        final_url: String,
        navigation_delay: Duration,
        fail_navigate: bool,
        fail_screenshot: bool,
        fail_close: bool,
        closed: Arc<AtomicBool>,
    }

    impl FakeDriver {
        fn new(html: &str, closed: Arc<AtomicBool>) -> Self {
            Self {
                html: html.to_string(),
                final_url: "https://example.com/landing".to_string(),
                navigation_delay: Duration::ZERO,
                fail_navigate: false,
                fail_screenshot: false,
                fail_close: false,
                closed,
            }
        }
    }

    impl PageDriver for FakeDriver {
        async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
            tokio::time::sleep(self.navigation_delay).await;
            if self.fail_navigate {
                return Err(ScrapeError::Navigation {
                    url: url.to_string(),
                    message: "dns error: failed to lookup address".to_string(),
                });
            }
            Ok(())
        }

        async fn current_url(&self) -> Result<String, ScrapeError> {
            Ok(self.final_url.clone())
        }

        async fn title(&self) -> Result<String, ScrapeError> {
            Ok("Fixture".to_string())
        }

        async fn rendered_html(&self) -> Result<String, ScrapeError> {
            Ok(self.html.clone())
        }

        async fn form_snapshots(&self) -> Result<Vec<FormSnapshot>, ScrapeError> {
            snapshot_forms(&Html::parse_document(&self.html))
        }

        async fn screenshot(&self) -> Result<Vec<u8>, ScrapeError> {
            if self.fail_screenshot {
                return Err(ScrapeError::Screenshot("no display".to_string()));
            }
            Ok(vec![0x89, b'P', b'N', b'G'])
        }

        async fn close(self) -> Result<(), ScrapeError> {
            self.closed.store(true, Ordering::SeqCst);
            if self.fail_close {
                return Err(ScrapeError::Teardown("session already gone".to_string()));
            }
            Ok(())
        }
    }

    fn test_config(dir: &tempfile::TempDir) -> ScraperConfig {
        ScraperConfig {
            settle_delay_ms: 0,
            navigation_timeout_ms: 200,
            screenshot_dir: dir.path().to_path_buf(),
            ..ScraperConfig::default()
        }
    }

    #[tokio::test]
    async fn test_successful_scrape() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let driver = FakeDriver::new(PAGE, closed.clone());

        let result = scrape_page(driver, "https://example.com/", &test_config(&dir)).await;

        assert!(result.is_success(), "{:?}", result.error);
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(result.final_url.as_deref(), Some("https://example.com/landing"));
        assert_eq!(result.title.as_deref(), Some("Fixture"));
        assert_eq!(result.meta["description"], "A test page");
        assert_eq!(result.meta["title"], "Fixture");
        assert!(result.error.is_none());

        let links = &result.content.links;
        assert_eq!(links.len(), 2);
        assert!(!links[0].is_external);
        assert!(links[1].is_external);

        assert_eq!(result.content.forms[0].method, "POST");
        assert!(result.content.forms[0].inputs[0].required);
        assert_eq!(result.content.navigation[0].kind, NavigationKind::Nav);

        assert_eq!(result.statistics.total_links, 2);
        assert_eq!(result.statistics.total_forms, 1);
        assert_eq!(result.statistics.total_tables, 1);
        assert_eq!(
            result.statistics.text_length,
            result.content.text.full_text.chars().count()
        );

        let screenshot = result.screenshot.unwrap();
        assert!(screenshot.starts_with(dir.path()));
        assert_eq!(std::fs::read(&screenshot).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_navigation_timeout_returns_error_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let mut driver = FakeDriver::new(PAGE, closed.clone());
        driver.navigation_delay = Duration::from_secs(10);

        let result = scrape_page(driver, "https://slow.example.com/", &test_config(&dir)).await;

        assert_eq!(result.status, ScrapeStatus::Error);
        assert!(closed.load(Ordering::SeqCst));
        assert!(result.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(result.content, crate::results::PageContent::default());
        assert!(result.meta.is_empty());
        assert_eq!(result.statistics, Statistics::default());
        assert!(result.screenshot.is_none());
    }

    #[tokio::test]
    async fn test_screenshot_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let mut driver = FakeDriver::new(PAGE, closed.clone());
        driver.fail_screenshot = true;

        let result = scrape_page(driver, "https://example.com/", &test_config(&dir)).await;

        assert_eq!(result.status, ScrapeStatus::Error);
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(result.error.as_deref(), Some("screenshot failed: no display"));
    }

    #[tokio::test]
    async fn test_failed_teardown_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let mut driver = FakeDriver::new(PAGE, closed.clone());
        driver.fail_close = true;

        let result = scrape_page(driver, "https://example.com/", &test_config(&dir)).await;

        assert_eq!(result.status, ScrapeStatus::Error);
        assert!(result.error.as_deref().unwrap().contains("failed to close"));
        assert_eq!(result.content, crate::results::PageContent::default());

        let screenshot = result.screenshot.expect("written screenshot is still reported");
        assert!(screenshot.exists());
    }

    #[tokio::test]
    async fn test_navigation_failure_returns_error_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let mut driver = FakeDriver::new(PAGE, closed.clone());
        driver.fail_navigate = true;

        let result = scrape_page(driver, "https://nowhere.invalid/", &test_config(&dir)).await;

        assert_eq!(result.status, ScrapeStatus::Error);
        assert!(closed.load(Ordering::SeqCst));
        assert!(result.error.as_deref().unwrap().contains("dns error"));
        assert!(result.final_url.is_none());
        assert_eq!(result.content, crate::results::PageContent::default());
        assert!(result.meta.is_empty());
        assert_eq!(result.statistics, Statistics::default());
        assert!(result.screenshot.is_none());
    }

    #[tokio::test]
    async fn test_settle_delay_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let driver = FakeDriver::new(PAGE, closed.clone());
        let config = ScraperConfig {
            settle_delay_ms: 150,
            ..test_config(&dir)
        };

        let started = std::time::Instant::now();
        let result = scrape_page(driver, "https://example.com/", &config).await;

        assert!(result.is_success(), "{:?}", result.error);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_links_resolve_against_requested_url() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let html = r#"<a href="https://example.com/about">About</a><a href="/contact">Contact</a>
            <img src="logo.png">"#;
        let mut driver = FakeDriver::new(html, closed.clone());
        driver.final_url = "https://www.example.com/landing".to_string();

        let result = scrape_page(driver, "https://example.com/", &test_config(&dir)).await;

        assert!(result.is_success(), "{:?}", result.error);
        assert_eq!(result.final_url.as_deref(), Some("https://www.example.com/landing"));

        let links = &result.content.links;
        assert!(!links[0].is_external);
        assert_eq!(links[1].absolute_url, "https://example.com/contact");
        assert!(!links[1].is_external);
        assert_eq!(result.content.images[0].absolute_url, "https://example.com/logo.png");
    }

    #[tokio::test]
    async fn test_unparsable_url_is_rejected_before_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let driver = FakeDriver::new(PAGE, closed.clone());

        let result = scrape_page(driver, "not a url", &test_config(&dir)).await;

        assert_eq!(result.status, ScrapeStatus::Error);
        assert!(closed.load(Ordering::SeqCst));
        assert!(result.screenshot.is_none());
    }
}
