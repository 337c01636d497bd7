/*
[INPUT]:  HTTP configuration (region base URL, timeouts, client credentials)
[OUTPUT]: Configured reqwest client ready for workflow API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, Url};

use crate::auth::TokenCache;
use crate::http::{Result, TaskViewerError};
use crate::types::Region;

/// Longest error body excerpt carried into an error message
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Reuse access tokens until they expire instead of requesting one per call
    pub cache_tokens: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            cache_tokens: false,
        }
    }
}

/// Client credential pair exchanged for bearer tokens
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Main HTTP client for the workflow task API
#[derive(Debug, Clone)]
pub struct TaskApiClient {
    http_client: Client,
    base_url: Url,
    credentials: Credentials,
    token_cache: Option<TokenCache>,
}

impl TaskApiClient {
    /// Create a new client for a tenancy region with default configuration
    pub fn new(region: Region, credentials: Credentials) -> Result<Self> {
        Self::with_config(ClientConfig::default(), region, credentials)
    }

    /// Create a new client for a tenancy region with custom configuration
    pub fn with_config(config: ClientConfig, region: Region, credentials: Credentials) -> Result<Self> {
        Self::with_config_and_base_url(config, region.base_url(), credentials)
    }

    /// Create a client against an explicit base URL.
    ///
    /// This is primarily intended for tests pointing at a mock server.
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        if credentials.client_id.trim().is_empty() || credentials.client_secret.trim().is_empty() {
            return Err(TaskViewerError::Config(
                "client id and client secret are required".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            credentials,
            token_cache: config.cache_tokens.then(TokenCache::new),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn token_cache(&self) -> Option<&TokenCache> {
        self.token_cache.as_ref()
    }

    /// Build full URL for an API endpoint
    pub fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Build an unauthenticated request
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build a bearer-authenticated request
    pub(crate) fn authorized_request(
        &self,
        method: Method,
        endpoint: &str,
        access_token: &str,
    ) -> Result<RequestBuilder> {
        Ok(self
            .request(method, endpoint)?
            .header(AUTHORIZATION, format!("Bearer {access_token}")))
    }

    /// Send a request and map a non-success status into [`TaskViewerError::Api`]
    pub(crate) async fn send_checked(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Some(cache) = &self.token_cache {
                cache.invalidate();
            }
        }

        let message = error_excerpt(response).await;
        tracing::warn!(status = status.as_u16(), %message, "API request failed");
        Err(TaskViewerError::api_error(status, message))
    }
}

async fn error_excerpt(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => body.chars().take(ERROR_BODY_LIMIT).collect(),
        _ => format!("API returned status: {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("client", "secret")
    }

    #[test]
    fn test_region_client_uses_region_base() {
        let client = TaskApiClient::new(Region::Au, credentials()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://au.nintex.io/");
        assert_eq!(
            client.url("/workflows/v2/tasks?status=active").unwrap().as_str(),
            "https://au.nintex.io/workflows/v2/tasks?status=active"
        );
    }

    #[test]
    fn test_unknown_region_uses_us_base() {
        let client = TaskApiClient::new(Region::from_code("zz"), credentials()).unwrap();
        assert_eq!(client.base_url().host_str(), Some("us.nintex.io"));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = TaskApiClient::new(Region::Us, Credentials::new("", "secret")).unwrap_err();
        assert!(matches!(err, TaskViewerError::Config(_)));
    }

    #[test]
    fn test_token_cache_is_opt_in() {
        let client = TaskApiClient::new(Region::Us, credentials()).unwrap();
        assert!(client.token_cache().is_none());

        let config = ClientConfig {
            cache_tokens: true,
            ..ClientConfig::default()
        };
        let client = TaskApiClient::with_config(config, Region::Us, credentials()).unwrap();
        assert!(client.token_cache().is_some());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let rendered = format!("{:?}", Credentials::new("client", "hunter2"));
        assert!(rendered.contains("client"));
        assert!(!rendered.contains("hunter2"));
    }
}
