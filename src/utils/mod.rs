//! Utility functions and helpers.

pub mod dom;
pub mod time;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a URL string against a base URL string.
pub fn resolve(base_url: &str, href: &str) -> String {
    Url::parse(base_url)
        .map(|base| resolve_url(&base, href))
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/boards/").unwrap();
        assert_eq!(
            resolve_url(&base, "400-current-events/123"),
            "https://example.com/boards/400-current-events/123"
        );
        assert_eq!(
            resolve_url(&base, "/users/someone/boards"),
            "https://example.com/users/someone/boards"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_resolve_keeps_href_on_bad_base() {
        assert_eq!(resolve("not a url", "/boards/1"), "/boards/1");
    }
}
