use std::time::Duration;
use thiserror::Error;

/// Broad category of a scrape failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The page could not be reached or did not settle in time
    Navigation,
    /// The rendered document could not be turned into content
    Extraction,
    /// Browser session, screenshot or teardown trouble
    Resource,
}

/// Errors raised while driving the browser or extracting content
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("navigation to {url} timed out after {}ms", .timeout.as_millis())]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("failed to start browser session: {0}")]
    Session(String),

    #[error("browser command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("failed to write screenshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to close browser session: {0}")]
    Teardown(String),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::InvalidUrl { .. }
            | ScrapeError::NavigationTimeout { .. }
            | ScrapeError::Navigation { .. } => FailureKind::Navigation,
            ScrapeError::Extraction(_) => FailureKind::Extraction,
            ScrapeError::Session(_)
            | ScrapeError::Command(_)
            | ScrapeError::Screenshot(_)
            | ScrapeError::Io(_)
            | ScrapeError::Teardown(_) => FailureKind::Resource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_and_kind() {
        let err = ScrapeError::NavigationTimeout {
            url: "https://example.com".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            err.to_string(),
            "navigation to https://example.com timed out after 30000ms"
        );
        assert_eq!(err.kind(), FailureKind::Navigation);
    }

    #[test]
    fn test_resource_kinds() {
        assert_eq!(
            ScrapeError::Teardown("gone".into()).kind(),
            FailureKind::Resource
        );
        assert_eq!(
            ScrapeError::Extraction("bad selector".into()).kind(),
            FailureKind::Extraction
        );
    }
}
