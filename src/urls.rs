use url::Url;

/// Resolve an href against the page URL using standard URL joining rules.
///
/// Relative, protocol-relative and fragment references all resolve. If the
/// href cannot be joined at all it is returned unchanged.
pub fn resolve_url(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            ::log::debug!("Could not resolve {:?} against {}: {}", href, base, e);
            href.to_string()
        }
    }
}

/// A link is external when its host differs from the page host.
///
/// Scheme and port are not compared. An unparsable link has no host and is
/// therefore external unless the page has none either.
pub fn is_external(base: &Url, absolute_url: &str) -> bool {
    let link_host = Url::parse(absolute_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    link_host.as_deref() != base.host_str()
}

/// Host of a URL for naming purposes, or "unknown" when it has none
pub fn host_label(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page.html").unwrap()
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_url(&base(), "other.html"),
            "https://example.com/docs/other.html"
        );
        assert_eq!(resolve_url(&base(), "/root"), "https://example.com/root");
        assert_eq!(
            resolve_url(&base(), "../up.html"),
            "https://example.com/up.html"
        );
    }

    #[test]
    fn test_resolve_protocol_relative_and_fragment() {
        assert_eq!(
            resolve_url(&base(), "//cdn.example.org/lib.js"),
            "https://cdn.example.org/lib.js"
        );
        assert_eq!(
            resolve_url(&base(), "#section"),
            "https://example.com/docs/page.html#section"
        );
    }

    #[test]
    fn test_same_host_is_internal() {
        let resolved = resolve_url(&base(), "/about");
        assert!(!is_external(&base(), &resolved));
    }

    #[test]
    fn test_scheme_and_port_ignored() {
        assert!(!is_external(&base(), "http://example.com:8080/x"));
    }

    #[test]
    fn test_other_host_is_external() {
        assert!(is_external(&base(), "https://other.com/page"));
        assert!(is_external(&base(), "https://sub.example.com/page"));
    }

    #[test]
    fn test_mailto_is_external() {
        let resolved = resolve_url(&base(), "mailto:someone@example.com");
        assert!(is_external(&base(), &resolved));
    }

    #[test]
    fn test_host_label() {
        assert_eq!(host_label("https://www.example.com/a?b"), "www.example.com");
        assert_eq!(host_label("not a url"), "unknown");
    }
}
