//! Source URL parsing for document downloads.

/// Error type for source URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse a user-supplied source URL.
///
/// Steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an explicit `http` or `https` scheme
/// 3. Remove fragment (#...), which is never sent to the server
/// 4. Keep path and query string intact
pub fn parse_source_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::InvalidUrl("missing host".into()));
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Path plus query of a URL, the input to filename sanitization.
pub fn path_and_query(url: &url::Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let url = parse_source_url("https://example.com/files/report.docx").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/files/report.docx");
    }

    #[test]
    fn test_parse_requires_scheme() {
        let result = parse_source_url("example.com/report.docx");
        assert!(matches!(result, Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_lowercases_host() {
        let url = parse_source_url("https://EXAMPLE.COM/a.docx").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_parse_removes_fragment() {
        let url = parse_source_url("https://example.com/a.docx#page=2").unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_parse_preserves_query() {
        let url = parse_source_url("https://example.com/a.docx?ver=2&lang=en").unwrap();
        assert_eq!(url.query(), Some("ver=2&lang=en"));
    }

    #[test]
    fn test_parse_trim_whitespace() {
        let url = parse_source_url("  http://example.com/a.docx  ").unwrap();
        assert_eq!(url.as_str(), "http://example.com/a.docx");
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        let result = parse_source_url("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_source_url(""), Err(UrlError::Empty)));
        assert!(matches!(parse_source_url("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_path_and_query() {
        let url = parse_source_url("https://example.com/dl?name=report.docx").unwrap();
        assert_eq!(path_and_query(&url), "/dl?name=report.docx");

        let url = parse_source_url("https://example.com/report.docx").unwrap();
        assert_eq!(path_and_query(&url), "/report.docx");
    }
}
