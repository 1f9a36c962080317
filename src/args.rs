use clap::{Parser, ValueEnum};
use page_harvest::BrowserKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(about = "Renders a web page in a headless browser and extracts its content")]
#[command(version)]
pub struct Args {
    /// Page to scrape; https:// is assumed when no scheme is given
    pub url: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Browser to launch
    #[arg(short, long, value_enum)]
    pub browser: Option<BrowserArg>,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Delay after network idle in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Directory for screenshots
    #[arg(short, long)]
    pub screenshot_dir: Option<PathBuf>,

    /// Run the RFP reader on the page instead of printing the raw scrape
    #[arg(long)]
    pub rfp: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BrowserArg {
    Firefox,
    Chrome,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Firefox => BrowserKind::Firefox,
            BrowserArg::Chrome => BrowserKind::Chrome,
        }
    }
}

/// Prepend https:// when the target has no http or https scheme
pub fn normalize_target_url(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target_url() {
        assert_eq!(normalize_target_url("example.com"), "https://example.com");
        assert_eq!(normalize_target_url(" http://example.com "), "http://example.com");
        assert_eq!(normalize_target_url("https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_normalize_keeps_uppercase_scheme() {
        assert_eq!(normalize_target_url("HTTPS://example.com"), "HTTPS://example.com");
        assert_eq!(normalize_target_url("Http://example.com"), "Http://example.com");
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["page-harvest", "example.com", "--browser", "chrome", "--rfp"]);
        assert_eq!(args.url, "example.com");
        assert_eq!(args.browser, Some(BrowserArg::Chrome));
        assert!(args.rfp);
        assert!(!args.compact);
    }
}
