//! Client code for earthlings.
//!
//! This crate provides the paginated HTTP fetch against the character
//! catalog, shared by the server and CLI.

pub mod fetch;

pub use fetch::{CatalogClient, FetchConfig, Page, PageInfo, Pages, UrlError, parse_endpoint};
