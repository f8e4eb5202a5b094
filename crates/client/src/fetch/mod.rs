//! Paginated retrieval from the character catalog.
//!
//! ### Pagination
//! - The first request goes to the listing endpoint with the initial query.
//! - Every response carries `info.next`; while it is a URL, the next request
//!   goes to exactly that URL with no extra parameters (the link already
//!   encodes the filters).
//! - `info.next` null, absent or empty ends the sequence.
//!
//! Requests are strictly sequential because each address is only known once
//! the previous page is parsed.
//!
//! ### Failure policy
//! - Non-success status, transport failure or timeout: `FETCH_ERROR`
//! - Body that is not a `{ info, results }` page: `MALFORMED_RESPONSE`
//! - Nothing is retried; the first failure ends the fetch.

pub mod page;
pub mod url;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use self::page::{Page, PageInfo};
pub use self::url::{UrlError, parse_endpoint};

use earthlings_core::{AppConfig, Error, Record, RecordSource};

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "earthlings/0.1")
    pub user_agent: String,

    /// Maximum page body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Per-request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "earthlings/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// What the cursor requests next.
#[derive(Debug, Clone)]
enum PageRequest {
    /// Listing endpoint plus the initial query parameters.
    First { url: Url, query: Vec<(String, String)> },
    /// A server supplied `info.next` link, used verbatim.
    Next(String),
}

/// Lazy, finite sequence of catalog pages.
///
/// Yields one page per call until `info.next` runs out. After an error the
/// cursor is exhausted. Create a fresh cursor with [`CatalogClient::pages`]
/// to start over from the first page.
pub struct Pages<'a> {
    client: &'a CatalogClient,
    pending: Option<PageRequest>,
    fetched: usize,
}

impl Pages<'_> {
    /// Fetch the next page, or `None` once the sequence is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Page, Error>> {
        let request = self.pending.take()?;

        let result = match request {
            PageRequest::First { url, query } => self.client.get_page(url, &query).await,
            PageRequest::Next(link) => match parse_endpoint(&link) {
                Ok(url) => self.client.get_page(url, &[]).await,
                Err(e) => Err(Error::MalformedResponse { url: link, reason: format!("invalid next link: {}", e) }),
            },
        };

        if let Ok(page) = &result {
            self.fetched += 1;
            self.pending = page.info.next.clone().filter(|next| !next.is_empty()).map(PageRequest::Next);
        }

        Some(result)
    }

    /// Number of pages fetched successfully so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Whether another call to `next_page` would issue a request.
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_none()
    }
}

/// HTTP client for the character catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    config: FetchConfig,
}

impl CatalogClient {
    /// Create a new catalog client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network { url: String::new(), reason: format!("failed to build HTTP client: {}", e) })?;

        Ok(Self { http, config })
    }

    /// Start a page cursor at `base_url` with `initial_query`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` unless `base_url` is an absolute http(s) URL.
    pub fn pages(&self, base_url: &str, initial_query: &[(String, String)]) -> Result<Pages<'_>, Error> {
        let url = parse_endpoint(base_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        Ok(Pages {
            client: self,
            pending: Some(PageRequest::First { url, query: initial_query.to_vec() }),
            fetched: 0,
        })
    }

    /// Fetch every record across all pages, in page-then-within-page order.
    ///
    /// An empty result is valid. Any failure aborts the whole fetch; records
    /// from earlier pages are discarded.
    pub async fn fetch_all(&self, base_url: &str, initial_query: &[(String, String)]) -> Result<Vec<Record>, Error> {
        let start = Instant::now();
        let mut pages = self.pages(base_url, initial_query)?;
        let mut records = Vec::new();

        while let Some(page) = pages.next_page().await {
            records.extend(page?.results);
        }

        tracing::debug!(
            "fetched {} records from {} pages in {}ms",
            records.len(),
            pages.fetched(),
            start.elapsed().as_millis()
        );

        Ok(records)
    }

    /// Issue one GET and parse the body as a catalog page.
    async fn get_page(&self, url: Url, query: &[(String, String)]) -> Result<Page, Error> {
        let start = Instant::now();

        let mut request = self.http.get(url.clone()).header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| transport_error(url.as_str(), e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(Error::HttpStatus { url: final_url, status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::MalformedResponse {
                url: final_url,
                reason: format!("{} bytes exceeds {}", len, self.config.max_bytes),
            });
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(&final_url, e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::MalformedResponse {
                url: final_url,
                reason: format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes),
            });
        }

        let page: Page = serde_json::from_slice(&bytes)
            .map_err(|e| Error::MalformedResponse { url: final_url.clone(), reason: e.to_string() })?;

        tracing::debug!(
            "fetched page {} -> {} records in {}ms (next: {})",
            final_url,
            page.len(),
            start.elapsed().as_millis(),
            page.info.next.as_deref().unwrap_or("none")
        );

        Ok(page)
    }
}

#[async_trait]
impl RecordSource for CatalogClient {
    async fn fetch_all(&self, base_url: &str, initial_query: &[(String, String)]) -> Result<Vec<Record>, Error> {
        CatalogClient::fetch_all(self, base_url, initial_query).await
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout { url: url.to_string() }
    } else {
        Error::Network { url: url.to_string(), reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthlings_core::{Cache, CatalogQuery, OriginFilter};
    use mockito::{Matcher, Server};
    use serde_json::{Value, json};

    fn human_alive() -> Vec<(String, String)> {
        CatalogQuery::default().to_params()
    }

    fn character(id: i64, name: &str, origin: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "status": "Alive",
            "species": "Human",
            "type": "",
            "gender": "Female",
            "origin": { "name": origin, "url": "" },
            "location": { "name": format!("{origin} location"), "url": "" },
            "image": format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
            "episode": ["https://rickandmortyapi.com/api/episode/1"],
            "url": format!("https://rickandmortyapi.com/api/character/{id}"),
            "created": "2017-11-04T18:48:46.250Z"
        })
    }

    fn page_body(next: Option<String>, results: Vec<Value>) -> String {
        json!({
            "info": { "count": results.len(), "pages": 1, "next": next, "prev": null },
            "results": results
        })
        .to_string()
    }

    fn client() -> CatalogClient {
        CatalogClient::new(FetchConfig::default()).unwrap()
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name().unwrap()).collect()
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "earthlings/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "test-agent".into(), timeout_ms: 1500, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_follows_next_links_in_order() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());

        let first = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("species=Human&status=Alive".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(
                Some(format!("{base}?page=2&species=Human&status=Alive")),
                vec![character(1, "Rick", "Earth (C-137)"), character(2, "Morty", "Earth (C-137)")],
            ))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("page=2&species=Human&status=Alive".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(
                Some(format!("{base}?page=3&species=Human&status=Alive")),
                vec![character(3, "Summer", "Earth (Replacement Dimension)")],
            ))
            .expect(1)
            .create_async()
            .await;
        let third = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("page=3&species=Human&status=Alive".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(None, vec![character(4, "Beth", "Earth"), character(5, "Zorp", "Mars")]))
            .expect(1)
            .create_async()
            .await;

        let records = client().fetch_all(&base, &human_alive()).await.unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(names(&records), vec!["Rick", "Morty", "Summer", "Beth", "Zorp"]);
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_single_page_stops_without_further_requests() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());

        let only = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("species=Human&status=Alive".into()))
            .with_status(200)
            .with_body(page_body(None, vec![character(1, "Rick", "Earth (C-137)")]))
            .expect(1)
            .create_async()
            .await;
        let follow_up = server
            .mock("GET", "/api/character")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .expect(0)
            .create_async()
            .await;

        let client = client();
        let mut pages = client.pages(&base, &human_alive()).unwrap();
        let page = pages.next_page().await.unwrap().unwrap();
        assert_eq!(page.len(), 1);
        assert!(pages.is_exhausted());
        assert!(pages.next_page().await.is_none());
        assert_eq!(pages.fetched(), 1);

        only.assert_async().await;
        follow_up.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_result_is_valid() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(None, vec![]))
            .create_async()
            .await;

        let records = client().fetch_all(&base, &human_alive()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_on_later_page_aborts() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());

        let _first = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("species=Human&status=Alive".into()))
            .with_status(200)
            .with_body(page_body(
                Some(format!("{base}?page=2&species=Human&status=Alive")),
                vec![character(1, "Rick", "Earth (C-137)")],
            ))
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("page=2&species=Human&status=Alive".into()))
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = client().fetch_all(&base, &human_alive()).await.unwrap_err();
        assert!(err.is_fetch_error());
        assert_eq!(err.status(), Some(500));
        assert!(matches!(err, Error::HttpStatus { ref url, .. } if url.contains("page=2")));
    }

    #[tokio::test]
    async fn test_not_found_is_a_fetch_error() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":"There is nothing here"}"#)
            .create_async()
            .await;

        let err = client().fetch_all(&base, &human_alive()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_missing_info_is_malformed() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let err = client().fetch_all(&base, &human_alive()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { ref reason, .. } if reason.contains("info")));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client().fetch_all(&base, &human_alive()).await.unwrap_err();
        assert_eq!(err.code(), "MALFORMED_RESPONSE");
    }

    #[tokio::test]
    async fn test_oversized_page_rejected() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(None, vec![character(1, "Rick", "Earth (C-137)")]))
            .create_async()
            .await;

        let client = CatalogClient::new(FetchConfig { max_bytes: 16, ..Default::default() }).unwrap();
        let err = client.fetch_all(&base, &human_alive()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { ref reason, .. } if reason.contains("exceeds 16")));
    }

    #[tokio::test]
    async fn test_invalid_next_link_is_malformed() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(Some("?page=2".into()), vec![character(1, "Rick", "Earth (C-137)")]))
            .create_async()
            .await;

        let err = client().fetch_all(&base, &human_alive()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { ref url, .. } if url == "?page=2"));
    }

    #[tokio::test]
    async fn test_empty_next_link_ends_sequence() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(Some(String::new()), vec![character(1, "Rick", "Earth (C-137)")]))
            .expect(1)
            .create_async()
            .await;

        let records = client().fetch_all(&base, &human_alive()).await.unwrap();
        assert_eq!(names(&records), ["Rick"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unresponsive_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api/character", listener.local_addr().unwrap());
        let _hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let config = FetchConfig { timeout: Duration::from_millis(200), ..Default::default() };
        let client = CatalogClient::new(config).unwrap();

        let err = client.fetch_all(&base, &human_alive()).await.unwrap_err();
        assert!(matches!(err, Error::FetchTimeout { ref url } if url.starts_with(&base)));
        assert!(err.is_fetch_error());
        assert_eq!(err.code(), "FETCH_ERROR");
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_fetch_error() {
        let err = client().fetch_all("http://127.0.0.1:1/api/character", &human_alive()).await.unwrap_err();
        assert!(err.is_fetch_error());
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_relative_base_url_rejected_before_any_request() {
        let err = client().fetch_all("/api/character", &human_alive()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_pipeline_into_cache() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Exact("species=Human&status=Alive".into()))
            .with_status(200)
            .with_body(page_body(None, vec![character(1, "Rick", "Earth (C-137)"), character(2, "Zorp", "Mars")]))
            .create_async()
            .await;

        let cache = Cache::initialize(&client(), &base, &CatalogQuery::default(), &OriginFilter::earth())
            .await
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.summaries()[0].name, "Rick");
        assert_eq!(cache.summaries()[0].location, "Earth (C-137) location");
    }

    #[tokio::test]
    async fn test_pipeline_fails_on_server_error() {
        let mut server = Server::new_async().await;
        let base = format!("{}/api/character", server.url());
        let _mock = server
            .mock("GET", "/api/character")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let result = Cache::initialize(&client(), &base, &CatalogQuery::default(), &OriginFilter::earth()).await;
        assert!(matches!(result, Err(ref e) if e.is_fetch_error()));
    }
}
