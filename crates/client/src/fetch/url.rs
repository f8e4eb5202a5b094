//! Endpoint URL parsing for the catalog client.

/// Error type for endpoint URL failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("not an absolute URL: {0}")]
    Relative(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse an absolute http(s) endpoint URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an explicit http:// or https:// scheme
/// 3. Remove fragment (#...)
/// 4. Keep query string intact (do not reorder), since `info.next` links carry
///    the original filters there
pub fn parse_endpoint(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => UrlError::Relative(trimmed.to_string()),
        other => UrlError::InvalidUrl(other.to_string()),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
