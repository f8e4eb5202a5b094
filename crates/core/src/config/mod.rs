//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (EARTHLINGS_*)
//! 2. TOML config file (if EARTHLINGS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::{CatalogQuery, OriginFilter};

mod validation;

pub use validation::ConfigError;

/// Upstream character listing endpoint.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/character";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (EARTHLINGS_*)
/// 2. TOML config file (if EARTHLINGS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Character listing endpoint of the catalog API.
    ///
    /// Set via EARTHLINGS_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Species sent with the first request.
    #[serde(default = "default_species")]
    pub species: String,

    /// Status sent with the first request.
    #[serde(default = "default_status")]
    pub status: String,

    /// Substring `origin.name` must contain (case-sensitive).
    ///
    /// Set via EARTHLINGS_ORIGIN_CONTAINS environment variable.
    #[serde(default = "default_origin_contains")]
    pub origin_contains: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via EARTHLINGS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds, per page.
    ///
    /// Set via EARTHLINGS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes accepted for a single page body.
    ///
    /// Set via EARTHLINGS_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Address the HTTP service binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP service listens on.
    ///
    /// Set via EARTHLINGS_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Destination of the CSV export.
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_species() -> String {
    "Human".into()
}

fn default_status() -> String {
    "Alive".into()
}

fn default_origin_contains() -> String {
    crate::filter::EARTH.into()
}

fn default_user_agent() -> String {
    "earthlings/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_export_path() -> PathBuf {
    PathBuf::from(crate::export::DEFAULT_EXPORT_PATH)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            species: default_species(),
            status: default_status(),
            origin_contains: default_origin_contains(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            host: default_host(),
            port: default_port(),
            export_path: default_export_path(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Query sent with the first catalog request.
    pub fn query(&self) -> CatalogQuery {
        CatalogQuery::new(&self.species, &self.status)
    }

    pub fn origin_filter(&self) -> OriginFilter {
        OriginFilter::new(&self.origin_contains)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `EARTHLINGS_`
    /// 2. TOML file from `EARTHLINGS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered provider chain used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("EARTHLINGS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("EARTHLINGS_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
