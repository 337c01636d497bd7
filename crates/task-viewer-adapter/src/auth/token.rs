/*
[INPUT]:  Client credential pair and region endpoint held by TaskApiClient
[OUTPUT]: Short-lived bearer access token
[POS]:    Auth layer - client-credentials token exchange
[UPDATE]: When the token endpoint or grant body changes
*/

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use crate::http::{Result, TaskApiClient, TaskViewerError};
use crate::types::{TokenRequest, TokenResponse};

pub const TOKEN_ENDPOINT: &str = "/authentication/v1/token";

/// Lifetime assumed for cached tokens when the server does not state one
const DEFAULT_EXPIRES_SECONDS: u64 = 3600;

impl TaskApiClient {
    /// Exchange the client credentials for an access token
    ///
    /// POST /authentication/v1/token
    ///
    /// Requests a fresh token on every call unless token caching is enabled, in
    /// which case a still-valid token for the same client and endpoint is reused.
    pub async fn acquire_token(&self) -> Result<String> {
        let client_id = self.credentials().client_id.clone();
        let endpoint = self.base_url().to_string();

        if let Some(cache) = self.token_cache() {
            if let Some(token) = cache.get_token(&client_id, &endpoint) {
                tracing::debug!("using cached access token");
                return Ok(token);
            }
        }

        let body = TokenRequest::client_credentials(
            self.credentials().client_id.as_str(),
            self.credentials().client_secret.as_str(),
        );
        let builder = self
            .request(Method::POST, TOKEN_ENDPOINT)?
            .header(CONTENT_TYPE, "application/json")
            .json(&body);

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "token request rejected");
            return Err(TaskViewerError::auth_status(status));
        }

        let payload: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "token response was not valid JSON");
            TaskViewerError::missing_token()
        })?;

        let token = match payload.access_token {
            Some(token) if !token.trim().is_empty() => token,
            _ => {
                tracing::error!("token response did not contain an access token");
                return Err(TaskViewerError::missing_token());
            }
        };

        if let Some(cache) = self.token_cache() {
            cache.set_token(
                token.clone(),
                payload.expires_in.unwrap_or(DEFAULT_EXPIRES_SECONDS),
                &client_id,
                &endpoint,
            );
        }

        tracing::debug!(expires_in = ?payload.expires_in, "access token acquired");
        Ok(token)
    }
}
