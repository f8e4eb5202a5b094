//! Core types and shared functionality for earthlings.
//!
//! This crate provides:
//! - The raw character record and its typed accessors
//! - The origin filter and the upstream query
//! - The immutable process-lifetime cache
//! - CSV export
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod query;
pub mod record;
pub mod view;

pub use cache::{Cache, RecordSource};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use export::{export_csv, write_csv};
pub use filter::{OriginFilter, filter_by_origin, filter_earth};
pub use query::CatalogQuery;
pub use record::Record;
pub use view::{CharacterDetail, CharacterSummary, Listing};
