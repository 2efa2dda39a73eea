//! HTTP client implementation and timing measurements

use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client trait for abstraction and testing
///
/// Every call is timed from just before the request is sent until the
/// response body has been read in full. Transport failures are errors; any
/// HTTP status, including 4xx and 5xx, is a completed response.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// POST a JSON document
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse>;

    /// POST raw bytes as `application/octet-stream`
    async fn post_bytes(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse>;
}

/// Completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            AppError::parse(format!(
                "Response body is not JSON (status {}): {}",
                self.status_code, e
            ))
        })
    }
}

/// reqwest-backed client; one instance keeps its connections alive across calls
#[derive(Debug, Clone)]
pub struct NetworkClient {
    client: Client,
}

impl NetworkClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse> {
        let start = Instant::now();
        let response = request.send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;
        let elapsed = start.elapsed();

        Ok(HttpResponse {
            status_code,
            body,
            elapsed,
        })
    }
}

#[async_trait]
impl HttpClient for NetworkClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.execute(self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.execute(self.client.post(url).json(body)).await
    }

    async fn post_bytes(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse> {
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body);
        self.execute(request).await
    }
}

/// HTTP client factory
pub struct ClientFactory;

impl ClientFactory {
    /// Client shared by every request of one run
    pub fn create_network_client() -> Result<NetworkClient> {
        NetworkClient::new()
    }
}

/// Utility functions for HTTP operations
pub struct HttpUtils;

impl HttpUtils {
    /// Validate URL format
    pub fn validate_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::validation(format!("Invalid URL format '{}': {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::validation(format!(
                    "Unsupported URL scheme: {}",
                    scheme
                )))
            }
        }

        if parsed.host().is_none() {
            return Err(AppError::validation("URL must have a host"));
        }

        Ok(())
    }

    /// Append `path` to the base URL's path
    pub fn join_path(base: &str, path: &str) -> Result<String> {
        let mut parsed = Url::parse(base)?;
        let joined = format!(
            "{}/{}",
            parsed.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        parsed.set_path(&joined);
        Ok(parsed.to_string())
    }

    /// Add the relay `api-key` query parameter
    pub fn with_api_key(url: &str, api_key: &str) -> Result<String> {
        let mut parsed = Url::parse(url)?;
        parsed.query_pairs_mut().append_pair("api-key", api_key);
        Ok(parsed.to_string())
    }

    /// Extract the host from a URL
    pub fn extract_domain(url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        parsed
            .host_str()
            .ok_or_else(|| AppError::validation("URL must have a host"))
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_validate_url() {
        assert!(HttpUtils::validate_url("https://de.0slot.trade").is_ok());
        assert!(HttpUtils::validate_url("http://127.0.0.1:8080/").is_ok());
        assert!(HttpUtils::validate_url("ftp://example.com").is_err());
        assert!(HttpUtils::validate_url("not a url").is_err());
    }

    #[test]
    fn test_url_helpers() {
        assert_eq!(
            HttpUtils::join_path("https://de.0slot.trade", "txb").unwrap(),
            "https://de.0slot.trade/txb"
        );
        assert_eq!(
            HttpUtils::join_path("http://127.0.0.1:9000/", "/health").unwrap(),
            "http://127.0.0.1:9000/health"
        );
        assert_eq!(
            HttpUtils::with_api_key("https://ny.0slot.trade", "abc").unwrap(),
            "https://ny.0slot.trade/?api-key=abc"
        );
        assert_eq!(
            HttpUtils::extract_domain("https://ams.0slot.trade/txb").unwrap(),
            "ams.0slot.trade"
        );
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse {
            status_code: 503,
            body: "{\"ok\":false}".to_string(),
            elapsed: Duration::from_millis(5),
        };
        assert!(!response.is_success());
        assert_eq!(response.json().unwrap()["ok"], false);
    }

    #[tokio::test]
    async fn test_error_status_is_a_completed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = NetworkClient::new().unwrap();
        let response = client.get(&server.uri()).await.unwrap();
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "boom");
    }

    #[tokio::test]
    async fn test_post_bytes_sends_octet_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/txb"))
            .and(header("content-type", "application/octet-stream"))
            .and(body_bytes(vec![1u8, 2, 3]))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = NetworkClient::new().unwrap();
        let url = format!("{}/txb", server.uri());
        let response = client.post_bytes(&url, vec![1, 2, 3]).await.unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = NetworkClient::new().unwrap();
        let err = client.get("http://127.0.0.1:1/").await.unwrap_err();
        assert!(err.is_transport());
    }
}
