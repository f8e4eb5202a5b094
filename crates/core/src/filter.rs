//! Origin filter applied to the fetched records.
//!
//! Species and status are narrowed upstream through the query string; the
//! origin check happens here because the catalog has no origin parameter.

use crate::{Error, Record};

/// Substring every kept record's `origin.name` must contain.
pub const EARTH: &str = "Earth";

/// Case-sensitive substring predicate over `origin.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginFilter {
    needle: String,
}

impl Default for OriginFilter {
    fn default() -> Self {
        Self::earth()
    }
}

impl OriginFilter {
    pub fn new(needle: impl Into<String>) -> Self {
        Self { needle: needle.into() }
    }

    /// Matches "Earth (C-137)", "Earth (Replacement Dimension)" and plain "Earth".
    pub fn earth() -> Self {
        Self::new(EARTH)
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Whether the record's origin contains the needle.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingField` when `origin` or `origin.name` is absent.
    /// A broken record is a data-integrity problem, not a filter miss.
    pub fn matches(&self, record: &Record) -> Result<bool, Error> {
        Ok(record.origin_name()?.contains(self.needle.as_str()))
    }

    /// Keep the matching records, preserving their order.
    ///
    /// The input is left untouched; kept records are cloned whole.
    pub fn apply(&self, records: &[Record]) -> Result<Vec<Record>, Error> {
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if self.matches(record)? {
                kept.push(record.clone());
            }
        }

        tracing::debug!(needle = %self.needle, input = records.len(), kept = kept.len(), "applied origin filter");

        Ok(kept)
    }
}

/// Keep records whose origin name contains `needle`.
pub fn filter_by_origin(records: &[Record], needle: &str) -> Result<Vec<Record>, Error> {
    OriginFilter::new(needle).apply(records)
}

/// Keep records whose origin name contains "Earth".
pub fn filter_earth(records: &[Record]) -> Result<Vec<Record>, Error> {
    OriginFilter::earth().apply(records)
}
