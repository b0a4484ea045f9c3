//! Destination handling
//!
//! Turns user-entered text into a loadable URL and, when the relay is
//! enabled, rewrites it to go through the content relay.

use url::Url;

use crate::error::{NavigatorError, Result};

/// Public relay that fetches and re-serves a page
pub const DEFAULT_RELAY_BASE: &str = "https://api.allorigins.win/raw";

/// Trim and add `https://` when no http(s) scheme is given
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }

    format!("https://{}", trimmed)
}

/// Reject input that cannot be loaded as a web page
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(NavigatorError::InvalidDestination(
            "URL cannot be empty".to_string(),
        ));
    }

    let lower = url.trim().to_lowercase();
    if lower.starts_with("chrome://") || lower.starts_with("about:") {
        return Err(NavigatorError::InvalidDestination(
            "browser internal URLs are not allowed".to_string(),
        ));
    }

    let parsed = Url::parse(&normalize_url(url))
        .map_err(|err| NavigatorError::InvalidDestination(format!("{}: {}", url.trim(), err)))?;
    if parsed.host_str().is_none() {
        return Err(NavigatorError::InvalidDestination(format!(
            "{}: missing host",
            url.trim()
        )));
    }

    Ok(())
}

/// Validate then normalize user input
pub fn prepare(url: &str) -> Result<String> {
    validate_url(url)?;
    Ok(normalize_url(url))
}

/// Build `<relay-base>?url=<percent-encoded destination>`
pub fn relay_url(relay_base: &str, destination: &str) -> Result<String> {
    let mut relay = Url::parse(relay_base).map_err(|err| {
        NavigatorError::InvalidArguments(format!("relay base '{}': {}", relay_base, err))
    })?;
    relay.query_pairs_mut().append_pair("url", destination);
    Ok(relay.into())
}

/// Address actually handed to the surface for `destination`
///
/// Only http(s) destinations go through the relay.
pub fn resolve(destination: &str, relay_base: Option<&str>) -> Result<String> {
    match relay_base {
        Some(base) if destination.starts_with("http://") || destination.starts_with("https://") => {
            relay_url(base, destination)
        }
        _ => Ok(destination.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_https_scheme() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com/a "), "https://example.com/a");
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn validate_rejects_empty() {
        assert!(matches!(
            validate_url("   "),
            Err(NavigatorError::InvalidDestination(_))
        ));
    }

    #[test]
    fn validate_rejects_internal_pages() {
        assert!(validate_url("chrome://settings").is_err());
        assert!(validate_url("about:blank").is_err());
    }

    #[test]
    fn validate_rejects_unparseable_host() {
        assert!(validate_url("exa mple.com").is_err());
    }

    #[test]
    fn prepare_returns_normalized_url() {
        assert_eq!(
            prepare("read.amazon.com").unwrap(),
            "https://read.amazon.com"
        );
    }

    #[test]
    fn relay_url_percent_encodes_destination() {
        let relayed = relay_url(DEFAULT_RELAY_BASE, "https://example.com/a?b=c&d=e").unwrap();
        assert_eq!(
            relayed,
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc%26d%3De"
        );
    }

    #[test]
    fn relay_url_rejects_bad_base() {
        assert!(matches!(
            relay_url("not a url", "https://example.com"),
            Err(NavigatorError::InvalidArguments(_))
        ));
    }

    #[test]
    fn resolve_without_relay_is_identity() {
        assert_eq!(
            resolve("https://example.com", None).unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn resolve_with_relay_skips_non_http_destinations() {
        assert_eq!(
            resolve("about:blank", Some(DEFAULT_RELAY_BASE)).unwrap(),
            "about:blank"
        );
        assert!(
            resolve("https://example.com", Some(DEFAULT_RELAY_BASE))
                .unwrap()
                .starts_with(DEFAULT_RELAY_BASE)
        );
    }
}
