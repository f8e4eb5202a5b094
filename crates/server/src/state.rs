//! Shared request-handling context.

use std::sync::Arc;

use earthlings_client::{CatalogClient, FetchConfig};
use earthlings_core::{AppConfig, Cache, CatalogQuery, Error, OriginFilter};

/// State handed to every handler.
///
/// The cache is built once before the router exists and is only ever read.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<Cache>,
    pub query: Arc<CatalogQuery>,
    pub origin: Arc<OriginFilter>,
}

impl AppState {
    pub fn new(cache: Cache, query: CatalogQuery, origin: OriginFilter) -> Self {
        Self { cache: Arc::new(cache), query: Arc::new(query), origin: Arc::new(origin) }
    }

    /// Fetch, filter and snapshot the catalog described by `config`.
    ///
    /// # Errors
    ///
    /// Any fetch, response or record error; the caller must not serve.
    pub async fn initialize(config: &AppConfig) -> Result<Self, Error> {
        let client = CatalogClient::new(FetchConfig::from(config))?;
        let query = config.query();
        let origin = config.origin_filter();

        let cache = Cache::initialize(&client, &config.base_url, &query, &origin).await?;

        Ok(Self::new(cache, query, origin))
    }
}
