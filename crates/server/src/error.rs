//! Structured startup errors for the earthlings server.
//!
//! Apart from `Serve`, every failure here happens before the listener accepts
//! a request; the process exits instead of serving an empty or partial cache.

use earthlings_core::ConfigError;

/// Reasons the server never becomes ready.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration could not be loaded or failed validation.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// Fetching, filtering or caching the catalog failed.
    #[error(transparent)]
    Pipeline(#[from] earthlings_core::Error),

    /// The listen address could not be bound.
    #[error("BIND_FAILED: {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },

    /// The server loop ended with an I/O error.
    #[error("SERVE_FAILED: {0}")]
    Serve(std::io::Error),
}

impl StartupError {
    /// Stable code for the structured startup log.
    pub fn code(&self) -> &'static str {
        match self {
            StartupError::Config(_) => "CONFIG_ERROR",
            StartupError::Pipeline(err) => err.code(),
            StartupError::Bind { .. } => "BIND_FAILED",
            StartupError::Serve(_) => "SERVE_FAILED",
        }
    }
}
