/*
[INPUT]:  Access tokens, their stated lifetime, and the credential/endpoint they belong to
[OUTPUT]: Token retrieval while still valid, invalidation on 401
[POS]:    Auth layer - optional token lifecycle management
[UPDATE]: When changing expiry policy or storage strategy
*/

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, PoisonError, RwLock};

/// Tokens are treated as expired this long before their stated expiry
const EXPIRY_MARGIN_SECONDS: i64 = 30;

/// Longest lifetime honoured for a cached token, whatever the server states
const MAX_LIFETIME_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
struct TokenData {
    token: String,
    expires_at: DateTime<Utc>,
    client_id: String,
    endpoint: String,
}

/// Thread-safe access token cache keyed by client id and endpoint
#[derive(Debug, Clone)]
pub struct TokenCache {
    data: Arc<RwLock<Option<TokenData>>>,
}

impl TokenCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(None)),
        }
    }

    /// Store a token valid for `expires_seconds` from now, capped at one day.
    ///
    /// Returns false, leaving the cache empty, when no expiry can be computed.
    pub fn set_token(
        &self,
        token: String,
        expires_seconds: u64,
        client_id: &str,
        endpoint: &str,
    ) -> bool {
        let Some(expires_at) = expiry_from_now(expires_seconds) else {
            tracing::warn!(expires_seconds, "token lifetime out of range; not caching");
            self.invalidate();
            return false;
        };
        let token_data = TokenData {
            token,
            expires_at,
            client_id: client_id.to_string(),
            endpoint: endpoint.to_string(),
        };

        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token_data);
        true
    }

    /// Get the cached token for this credential/endpoint pair if it has not expired
    pub fn get_token(&self, client_id: &str, endpoint: &str) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|data| data.client_id == client_id && data.endpoint == endpoint)
            .filter(|data| Utc::now() < data.expires_at)
            .map(|data| data.token.clone())
    }

    /// Drop the stored token
    pub fn invalidate(&self) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            tracing::debug!("cached access token invalidated");
        }
    }
}

fn expiry_from_now(expires_seconds: u64) -> Option<DateTime<Utc>> {
    let capped = i64::try_from(expires_seconds.min(MAX_LIFETIME_SECONDS)).ok()?;
    let lifetime = TimeDelta::try_seconds((capped - EXPIRY_MARGIN_SECONDS).max(0))?;
    Utc::now().checked_add_signed(lifetime)
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
