//! Catalog page response types.

use earthlings_core::Record;
use serde::Deserialize;

/// One page of the character listing: `{ info: {...}, results: [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub info: PageInfo,
    pub results: Vec<Record>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    /// Total matching records across all pages.
    #[serde(default)]
    pub count: Option<u64>,
    /// Total number of pages.
    #[serde(default)]
    pub pages: Option<u64>,
    /// Absolute URL of the following page; null or absent on the last one.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

impl Page {
    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
