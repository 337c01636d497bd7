/*
[INPUT]:  Error sources (HTTP transport, token endpoint, task API, response decoding)
[OUTPUT]: Structured error types with status context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the task viewer adapter
#[derive(Error, Debug)]
pub enum TaskViewerError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token request failed or returned no token
    #[error("Authentication failed: {message}")]
    Auth { status: Option<u16>, message: String },

    /// Task or outcome endpoint returned a non-success status
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TaskViewerError {
    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TaskViewerError::Api { status, .. } => Some(*status),
            TaskViewerError::Auth { status, .. } => *status,
            TaskViewerError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, TaskViewerError::Auth { .. })
            || self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// Check if the transport gave up waiting for the server
    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskViewerError::Http(err) if err.is_timeout())
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        TaskViewerError::Api {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// Create an auth error from the token endpoint's status code
    pub fn auth_status(status: StatusCode) -> Self {
        TaskViewerError::Auth {
            status: Some(status.as_u16()),
            message: format!("Server responded with status: {}", status.as_u16()),
        }
    }

    /// Create an auth error for a response without a usable token
    pub fn missing_token() -> Self {
        TaskViewerError::Auth {
            status: None,
            message: "No access token found in response".to_string(),
        }
    }
}

/// Result type alias for task viewer operations
pub type Result<T> = std::result::Result<T, TaskViewerError>;
