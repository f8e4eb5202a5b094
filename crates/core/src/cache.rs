//! Process-lifetime snapshot of the filtered catalog.
//!
//! The cache is built exactly once, before the presentation layer accepts
//! requests, and is never mutated afterwards. Callers share it behind an
//! `Arc`; reads need no locking.
//!
//! There is no refresh: a new snapshot requires a new process.

use async_trait::async_trait;

use crate::view::{CharacterDetail, CharacterSummary, Listing};
use crate::{CatalogQuery, Error, OriginFilter, Record};

/// Anything that can produce the full, ordered record sequence for a query.
///
/// Implemented by the HTTP catalog client; tests substitute in-memory sources.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record across all pages, in page-then-within-page order.
    async fn fetch_all(&self, base_url: &str, initial_query: &[(String, String)]) -> Result<Vec<Record>, Error>;
}

/// Immutable, ordered set of filtered records plus their precomputed projections.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    records: Vec<Record>,
    summaries: Vec<CharacterSummary>,
    details: Vec<CharacterDetail>,
}

impl Cache {
    /// Build a cache from already filtered records.
    ///
    /// Every record must carry the fields the listing and dashboard read, so
    /// a broken record fails here instead of on some later request.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingField` for the first incomplete record.
    pub fn from_records(records: Vec<Record>) -> Result<Self, Error> {
        let summaries = records
            .iter()
            .map(CharacterSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let details = records
            .iter()
            .map(CharacterDetail::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records, summaries, details })
    }

    /// Run the whole pipeline: fetch every page, filter by origin, snapshot.
    ///
    /// Any error aborts initialization; no partial cache is returned.
    pub async fn initialize<S>(
        source: &S, base_url: &str, query: &CatalogQuery, filter: &OriginFilter,
    ) -> Result<Self, Error>
    where
        S: RecordSource + ?Sized,
    {
        let fetched = source.fetch_all(base_url, &query.to_params()).await?;
        tracing::info!(
            species = %query.species,
            status = %query.status,
            count = fetched.len(),
            "fetched characters"
        );

        let filtered = filter.apply(&fetched)?;
        tracing::info!(origin_contains = filter.needle(), count = filtered.len(), "filtered characters");

        let cache = Self::from_records(filtered)?;
        tracing::info!(count = cache.len(), "cached characters");

        Ok(cache)
    }

    /// Cached records in upstream order, with every original field.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn summaries(&self) -> &[CharacterSummary] {
        &self.summaries
    }

    pub fn details(&self) -> &[CharacterDetail] {
        &self.details
    }

    /// Body of the JSON listing endpoint.
    pub fn listing(&self) -> Listing<'_> {
        Listing { count: self.summaries.len(), characters: &self.summaries }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
