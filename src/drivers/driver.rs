use crate::error::ScrapeError;
use crate::parsers::forms::FormSnapshot;

/// Capabilities a headless browser session offers to the scraper.
///
/// A driver serves exactly one scrape and is consumed by [`PageDriver::close`].
#[allow(async_fn_in_trait)]
pub trait PageDriver {
    /// Load a URL and wait until the network goes idle
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError>;

    /// URL of the loaded document, after redirects
    async fn current_url(&self) -> Result<String, ScrapeError>;

    /// Title of the loaded document
    async fn title(&self) -> Result<String, ScrapeError>;

    /// The DOM as it stands after scripts ran, serialized to HTML
    async fn rendered_html(&self) -> Result<String, ScrapeError>;

    /// Attribute snapshots of every form, read through live element handles
    async fn form_snapshots(&self) -> Result<Vec<FormSnapshot>, ScrapeError>;

    /// PNG capture of the whole page
    async fn screenshot(&self) -> Result<Vec<u8>, ScrapeError>;

    /// End the browser session
    async fn close(self) -> Result<(), ScrapeError>
    where
        Self: Sized;
}
