//! URL normalization and sanitization utilities.
//!
//! Every path that stores or compares original URLs goes through
//! [`normalize_url`], so `create` and `search` always agree on the same key.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to its canonical stored form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: only HTTP and HTTPS are accepted; the stored scheme is always `https`
/// 2. **Hostname**: lowercased
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 4. **Query and fragment**: dropped
/// 5. **Path**: case preserved, trailing `/` stripped
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
/// Returns [`UrlNormalizationError::MissingHost`] when no host is present.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTP://EXAMPLE.COM:80/Path/?q=1#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();

    url.set_host(Some(&host)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    url.set_scheme("https").map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set https scheme".to_string())
    })?;
    url.set_query(None);
    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple_https() {
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_forces_https() {
        assert_eq!(
            normalize_url("http://example.com/page").unwrap(),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_normalize_uppercase_host() {
        assert_eq!(
            normalize_url("https://EXAMPLE.COM/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize_url("https://example.com/docs/").unwrap(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_normalize_drops_query_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/search?q=rust#results").unwrap(),
            "https://example.com/search"
        );
    }

    #[test]
    fn test_normalize_remove_default_ports() {
        assert_eq!(
            normalize_url("http://example.com:80/path").unwrap(),
            "https://example.com/path"
        );
        assert_eq!(
            normalize_url("https://example.com:443/path").unwrap(),
            "https://example.com/path"
        );
    }

    #[test]
    fn test_normalize_keep_custom_port() {
        assert_eq!(
            normalize_url("http://example.com:8080/path").unwrap(),
            "https://example.com:8080/path"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_url("HTTP://Example.com:80/a/b/?x=1").unwrap();
        let twice = normalize_url(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com/a  ").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_normalize_invalid_url() {
        assert!(matches!(
            normalize_url("not a valid url").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_no_protocol() {
        assert!(matches!(
            normalize_url("example.com").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_empty_string() {
        assert!(normalize_url("").is_err());
    }

    #[test]
    fn test_normalize_rejects_other_protocols() {
        for input in [
            "ftp://example.com/file.txt",
            "javascript:alert('xss')",
            "mailto:test@example.com",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(
                    normalize_url(input).unwrap_err(),
                    UrlNormalizationError::UnsupportedProtocol
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_preserves_encoded_path() {
        assert!(
            normalize_url("https://example.com/path%20with%20spaces")
                .unwrap()
                .contains("path%20with%20spaces")
        );
    }
}
