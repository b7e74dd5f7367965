use super::types::{ArticlePage, Category};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Public Spaceflight News API (v4).
pub const DEFAULT_BASE_URL: &str = "https://api.spaceflightnewsapi.net/v4";

/// Number of articles requested per list or search call.
pub const DEFAULT_PAGE_LIMIT: u32 = 24;

/// Per-request budget covering connect, headers and body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Coarse classification used for logging and status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout, non-success status or oversized body.
    FetchFailed,
    /// The body was not the expected JSON shape.
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure API base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Malformed(_) => ErrorKind::MalformedResponse,
            ApiError::Timeout(_)
            | ApiError::Network(_)
            | ApiError::HttpStatus(_)
            | ApiError::ResponseTooLarge(_)
            | ApiError::InvalidBaseUrl(_)
            | ApiError::InsecureBaseUrl => ErrorKind::FetchFailed,
        }
    }
}

/// Typed client for the article endpoints.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted,
/// so a clone is handed to every spawned fetch task.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    page_limit: u32,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client with a pooled HTTP connection and default limits.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(3))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("spacenews/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http(http, base_url)
    }

    /// Wrap an existing HTTP client.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http,
            base_url: validate_base_url(base_url)?,
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Build the request URL for a category listing or keyword search.
    ///
    /// The search text is percent-encoded by `url`'s query serializer.
    pub fn endpoint(&self, category: Category, query: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(category.slug())
            .push("");
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(q) = query {
                pairs.append_pair("search", q);
            }
            pairs.append_pair("limit", &self.page_limit.to_string());
        }
        Ok(url)
    }

    /// Newest articles for a category.
    pub async fn list(&self, category: Category) -> Result<ArticlePage, ApiError> {
        self.fetch(category, None).await
    }

    /// Keyword search scoped to a category.
    pub async fn search(&self, category: Category, query: &str) -> Result<ArticlePage, ApiError> {
        self.fetch(category, Some(query)).await
    }

    /// Single GET with no retry. Recovery is always user-initiated.
    pub async fn fetch(
        &self,
        category: Category,
        query: Option<&str>,
    ) -> Result<ArticlePage, ApiError> {
        let url = self.endpoint(category, query)?;
        tracing::debug!(url = %url, "Fetching articles");

        let body = tokio::time::timeout(self.timeout, self.get_body(url))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        let page: ArticlePage = serde_json::from_slice(&body)?;
        tracing::debug!(
            category = %category,
            results = page.results.len(),
            total = page.count,
            "Articles fetched"
        );
        Ok(page)
    }

    async fn get_body(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

/// Parse the configured base URL and require HTTPS.
///
/// Plain HTTP is accepted only for loopback hosts so tests can point the
/// client at a local mock server.
fn validate_base_url(base: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base.trim()).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            let is_localhost = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if !is_localhost {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS API base URL");
                return Err(ApiError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base, "Using non-HTTPS API base URL (localhost only)");
        }
        other => return Err(ApiError::InvalidBaseUrl(format!("unsupported scheme {other}"))),
    }

    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(base.to_string()));
    }

    Ok(url)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_json(ids: &[u64]) -> serde_json::Value {
        let results: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "title": format!("Article {id}"),
                    "url": format!("https://example.com/{id}"),
                    "image_url": null,
                    "news_site": "NASA",
                    "summary": "Summary",
                    "published_at": "2024-05-01T12:00:00Z",
                    "updated_at": "2024-05-01T12:00:00Z",
                    "featured": false,
                    "launches": [],
                    "events": []
                })
            })
            .collect();
        serde_json::json!({
            "count": ids.len(),
            "next": null,
            "previous": null,
            "results": results
        })
    }

    #[test]
    fn test_endpoint_for_category() {
        let client = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        let url = client.endpoint(Category::Blogs, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.spaceflightnewsapi.net/v4/blogs/?limit=24"
        );
    }

    #[test]
    fn test_endpoint_encodes_search_text() {
        let client = ApiClient::new("https://api.example.com/v4/").unwrap();
        let url = client
            .endpoint(Category::Science, Some("mars & moon"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v4/science/?search=mars+%26+moon&limit=24"
        );
    }

    #[test]
    fn test_page_limit_override() {
        let client = ApiClient::new(DEFAULT_BASE_URL)
            .unwrap()
            .with_page_limit(10);
        let url = client.endpoint(Category::Articles, None).unwrap();
        assert!(url.as_str().ends_with("limit=10"));
    }

    #[test]
    fn test_http_base_url_rejected() {
        let result = ApiClient::new("http://evil.example.com/v4");
        assert!(matches!(result, Err(ApiError::InsecureBaseUrl)));
    }

    #[test]
    fn test_garbage_base_url_rejected() {
        let result = ApiClient::new("not a url");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn test_list_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/launches/"))
            .and(query_param("limit", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[1, 2, 3])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let page = client.list(Category::Launches).await.unwrap();
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].id, 1);
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/"))
            .and(query_param("search", "artemis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[7])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let page = client.search(Category::Articles, "artemis").await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 7);
    }

    #[tokio::test]
    async fn test_http_500_is_fetch_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.list(Category::Articles).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus(500)));
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
    }

    #[tokio::test]
    async fn test_bad_json_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"detail\": \"nope\"}"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.list(Category::Articles).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(&[1]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(100));
        let err = client.list(Category::Articles).await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout(_)));
        assert_eq!(err.to_string(), "Request timed out after 100ms");
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
    }
}
