//! Unified error types for earthlings.
//!
//! Every message is prefixed with a stable code so failures are easy to spot
//! in the structured startup logs.

/// Unified error types for the fetch, filter and cache pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Upstream answered with a non-success status.
    #[error("FETCH_ERROR: {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("FETCH_ERROR: request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The per-request timeout elapsed.
    #[error("FETCH_ERROR: request to {url} timed out")]
    FetchTimeout { url: String },

    /// The body was not the expected `{ info, results }` page.
    #[error("MALFORMED_RESPONSE: {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// A record lacks a field the filter or the presentation layer reads.
    #[error("MISSING_FIELD: record {record} has no usable `{field}`")]
    MissingField { record: String, field: &'static str },

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Writing the tabular export failed.
    #[error("EXPORT_FAILED: {0}")]
    Export(String),
}

impl Error {
    /// Stable code for the error family.
    pub fn code(&self) -> &'static str {
        match self {
            Error::HttpStatus { .. } | Error::Network { .. } | Error::FetchTimeout { .. } => "FETCH_ERROR",
            Error::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Error::MissingField { .. } => "MISSING_FIELD",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::Export(_) => "EXPORT_FAILED",
        }
    }

    /// True for every failure to obtain a successful upstream response.
    pub fn is_fetch_error(&self) -> bool {
        self.code() == "FETCH_ERROR"
    }

    /// HTTP status carried by the error, if upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Export(err.to_string())
    }
}
