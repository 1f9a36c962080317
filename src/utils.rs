use sha2::{Digest, Sha256};

use crate::urls::host_label;

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");

    // Limit filename length
    if name.len() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}

/// Short hex digest of a URL, used to tell screenshots of one host apart
pub fn url_digest(url: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(url.as_bytes()));
    digest[..12].to_string()
}

/// Screenshot file name derived from the target host and a hash of the URL.
///
/// Two scrapes of the same URL produce the same name.
pub fn screenshot_file_name(url: &str) -> String {
    format!(
        "screenshot_{}_{}.png",
        sanitize_filename(&host_label(url)),
        url_digest(url)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_name_shape() {
        let name = screenshot_file_name("https://example.com/pricing");
        assert!(name.starts_with("screenshot_example.com_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "screenshot_example.com_".len() + 12 + ".png".len());
    }

    #[test]
    fn test_screenshot_name_depends_on_url() {
        let a = screenshot_file_name("https://example.com/a");
        let b = screenshot_file_name("https://example.com/b");
        assert_ne!(a, b);
        assert_eq!(a, screenshot_file_name("https://example.com/a"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c?d"), "a_b_c_d");
        assert_eq!(sanitize_filename(&"x".repeat(150)).len(), 100);
    }
}
