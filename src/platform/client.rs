//! Authenticated HTTP client for the video platform API

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::utils::url::BASE_URL;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Environment variable that overrides the API base URL
pub const BASE_URL_ENV_VAR: &str = "SWITCHTUBE_BASE_URL";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, always ending in `/`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL; a trailing `/` is added when missing
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Take the base URL from `SWITCHTUBE_BASE_URL` when set
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(BASE_URL_ENV_VAR) {
            Ok(base_url) if !base_url.trim().is_empty() => self.with_base_url(base_url.trim()),
            _ => self,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the video platform API
#[derive(Clone)]
pub struct TubeClient {
    http: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
    cancel: CancellationToken,
}

impl TubeClient {
    /// Create a new client
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            http,
            config,
            tokens,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort in-flight requests when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token cancelling this client's requests
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Resolve `path` against the base URL
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&self.config.base_url)?.join(path.trim_start_matches('/'))?)
    }

    /// Authenticated GET; the status is not checked
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let token = self.tokens.get().map_err(ApiError::Token)?;
        let url = self.url(path)?;
        debug!("GET {}", url);

        let request = self
            .http
            .get(url)
            .header("Authorization", format!("Token {}", token))
            .header("Accept", "application/json")
            .send();

        self.cancellable(request)
            .await?
            .map_err(ApiError::Request)
    }

    /// Authenticated GET that requires `200 OK`.
    ///
    /// On any other status the body is drained before `HttpNotOk` is returned.
    pub async fn get_ok(&self, path: &str) -> Result<Response, ApiError> {
        let response = self.get(path).await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("Request for {} failed with status {}", path, status);
            let _ = self.cancellable(response.bytes()).await;
            return Err(ApiError::HttpNotOk(status));
        }
        Ok(response)
    }

    /// Authenticated GET decoding a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.get_ok(path).await?;
        let body = self
            .cancellable(response.bytes())
            .await?
            .map_err(ApiError::Request)?;
        serde_json::from_slice(&body).map_err(ApiError::Decode)
    }

    async fn cancellable<F: Future>(&self, future: F) -> Result<F::Output, ApiError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            output = future => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::error::TokenError;

    struct MissingToken;

    impl TokenProvider for MissingToken {
        fn get(&self) -> Result<String, TokenError> {
            Err(TokenError::NotFound)
        }
    }

    fn client(base_url: &str) -> TubeClient {
        let config = ClientConfig::new().with_base_url(base_url);
        TubeClient::new(config, Arc::new(StaticToken::new("secret"))).unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://tube.switch.ch/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("tubedl/"));
    }

    #[test]
    fn test_client_config_builders() {
        let config = ClientConfig::new()
            .with_base_url("http://localhost:1234")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "http://localhost:1234/");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_url_joins_relative_and_absolute_paths() {
        let client = client("https://tube.switch.ch/");
        assert_eq!(
            client.url("api/v1/browse/videos/abc").unwrap().as_str(),
            "https://tube.switch.ch/api/v1/browse/videos/abc"
        );
        assert_eq!(
            client.url("/storage/media/abc.mp4").unwrap().as_str(),
            "https://tube.switch.ch/storage/media/abc.mp4"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = client("not a url");
        assert!(matches!(client.url("x"), Err(ApiError::ConstructUrl(_))));
    }

    #[tokio::test]
    async fn test_get_sends_token_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Token secret")
            .with_status(200)
            .with_body("pong")
            .create_async()
            .await;

        let response = client(&server.url()).get_ok("ping").await.unwrap();
        assert_eq!(response.text().await.unwrap(), "pong");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_ok_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let result = client(&server.url()).get_ok("missing").await;
        assert!(matches!(result, Err(ApiError::HttpNotOk(StatusCode::NOT_FOUND))));
    }

    #[tokio::test]
    async fn test_decode_error_is_distinct() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let result: Result<Vec<String>, _> = client(&server.url()).get_json("garbage").await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_token_failure_stops_request() {
        let config = ClientConfig::new().with_base_url("http://127.0.0.1:9");
        let client = TubeClient::new(config, Arc::new(MissingToken)).unwrap();

        let result = client.get("anything").await;
        assert!(matches!(result, Err(ApiError::Token(TokenError::NotFound))));
    }

    #[tokio::test]
    async fn test_cancelled_client() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let client = client("http://127.0.0.1:9").with_cancellation(cancel);

        assert!(matches!(client.get("anything").await, Err(ApiError::Cancelled)));
    }
}
