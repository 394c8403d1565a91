//! OAuth2 client-credentials token provider.
//!
//! The platform expects a bearer token from the tenant's token endpoint with
//! the `{base_url}/.default` scope. Tokens are cached and refreshed ahead of
//! expiry so a workflow run does one token exchange, not one per call.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::traits::{RemoteError, RemoteResult};
use cdfup_core::config::ConnectionConfig;

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Fetches and caches bearer tokens for the client-credentials flow.
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, config: &ConnectionConfig) -> Self {
        TokenProvider {
            http,
            token_url: config.token_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope(),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, exchanging credentials if the cached one
    /// is missing or close to expiry.
    pub async fn bearer_token(&self) -> RemoteResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.token.clone());
            }
        }

        debug!(token_url = %self.token_url, "Exchanging client credentials for bearer token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Auth(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::Auth(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Auth(format!("Malformed token response: {}", e)))?;

        let entry = CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        let bearer = entry.token.clone();
        *cached = Some(entry);
        Ok(bearer)
    }
}
