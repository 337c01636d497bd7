/*
[INPUT]:  YAML configuration file plus TASK_VIEWER_* environment overrides
[OUTPUT]: Validated panel configuration
[POS]:    Configuration layer - credentials, region, filters, auto refresh
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use task_viewer_adapter::{ClientConfig, Credentials, Region};
use thiserror::Error;

pub const ENV_PREFIX: &str = "TASK_VIEWER";
pub const MIN_REFRESH_INTERVAL_SECONDS: u64 = 15;
pub const MAX_REFRESH_INTERVAL_SECONDS: u64 = 300;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Panel configuration, the surface a host page's property pane would edit
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PanelConfig {
    /// OAuth client id for the workflow API
    pub client_id: String,
    /// OAuth client secret for the workflow API
    pub client_secret: String,
    /// Tenancy region code: us, eu, au, ca, uk (anything else means us)
    #[serde(default)]
    pub tenancy_region: Region,
    /// Only show tasks from this workflow
    #[serde(default)]
    pub workflow_name: Option<String>,
    /// Show tasks for this user instead of the signed-in user
    #[serde(default)]
    pub assignee_email: Option<String>,
    /// Email of the signed-in user, used by the "my tasks" view
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub auto_refresh_enabled: bool,
    #[serde(default = "default_refresh_interval")]
    pub auto_refresh_interval_seconds: u64,
    /// Reuse access tokens until they expire
    #[serde(default)]
    pub cache_tokens: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_refresh_interval() -> u64 {
    MIN_REFRESH_INTERVAL_SECONDS
}

fn default_request_timeout() -> u64 {
    30
}

impl std::fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenancy_region", &self.tenancy_region)
            .field("workflow_name", &self.workflow_name)
            .field("assignee_email", &self.assignee_email)
            .field("user_email", &self.user_email)
            .field("auto_refresh_enabled", &self.auto_refresh_enabled)
            .field("auto_refresh_interval_seconds", &self.auto_refresh_interval_seconds)
            .field("cache_tokens", &self.cache_tokens)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl PanelConfig {
    /// Minimal configuration with defaults for everything but credentials
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenancy_region: Region::default(),
            workflow_name: None,
            assignee_email: None,
            user_email: None,
            auto_refresh_enabled: false,
            auto_refresh_interval_seconds: default_refresh_interval(),
            cache_tokens: false,
            request_timeout_seconds: default_request_timeout(),
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML file layered with `TASK_VIEWER_*` environment
    /// variables, e.g. `TASK_VIEWER_CLIENT_SECRET`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).format(::config::FileFormat::Yaml))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("client_id is required".to_string()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("client_secret is required".to_string()));
        }
        if self.auto_refresh_enabled
            && !(MIN_REFRESH_INTERVAL_SECONDS..=MAX_REFRESH_INTERVAL_SECONDS)
                .contains(&self.auto_refresh_interval_seconds)
        {
            return Err(ConfigError::Invalid(format!(
                "auto_refresh_interval_seconds must be between {MIN_REFRESH_INTERVAL_SECONDS} and {MAX_REFRESH_INTERVAL_SECONDS}, got {}",
                self.auto_refresh_interval_seconds
            )));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Refresh period in seconds, or `None` when auto refresh is off
    pub fn refresh_interval_seconds(&self) -> Option<u64> {
        (self.auto_refresh_enabled && self.auto_refresh_interval_seconds > 0)
            .then_some(self.auto_refresh_interval_seconds)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.trim(), self.client_secret.trim())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.request_timeout_seconds),
            cache_tokens: self.cache_tokens,
            ..ClientConfig::default()
        }
    }

    /// Settings that require a new API client when they change
    pub(crate) fn connection_changed(&self, other: &Self) -> bool {
        self.client_id != other.client_id
            || self.client_secret != other.client_secret
            || self.tenancy_region != other.tenancy_region
            || self.cache_tokens != other.cache_tokens
            || self.request_timeout_seconds != other.request_timeout_seconds
    }

    /// Settings that feed the filter state
    pub(crate) fn filters_changed(&self, other: &Self) -> bool {
        self.workflow_name != other.workflow_name
            || self.assignee_email != other.assignee_email
            || self.user_email != other.user_email
    }
}
