//! Client-credentials token cache for the store API.
//!
//! The token is acquired lazily on the first call and refreshed once the
//! `expires` timestamp returned by the token endpoint has passed. It never
//! leaves this module: requests are authorized in place.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::CatalogError;

/// Refresh this long before the advertised expiry.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Unix timestamp after which the token is rejected.
    expires: i64,
}

struct CachedToken {
    access_token: Secret<String>,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_response(response: TokenResponse) -> Result<Self, CatalogError> {
        let expires_at = Utc
            .timestamp_opt(response.expires, 0)
            .single()
            .ok_or_else(|| {
                CatalogError::InvalidResponse(format!(
                    "token expiry out of range: {}",
                    response.expires
                ))
            })?;
        Ok(Self {
            access_token: Secret::new(response.access_token),
            expires_at,
        })
    }

    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Acquire-or-refresh cache for one set of client credentials.
#[derive(Clone)]
pub struct CredentialCache {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: Arc<Secret<String>>,
    cached: Arc<RwLock<Option<CachedToken>>>,
}

impl CredentialCache {
    pub fn new(
        http: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Secret<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: Arc::new(client_secret),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Attaches a valid bearer token to `request`, fetching one if needed.
    pub async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, CatalogError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
                return Ok(request.bearer_auth(token.access_token.expose_secret()));
            }
        }

        let token = self.fetch().await?;
        let request = request.bearer_auth(token.access_token.expose_secret());
        *self.cached.write().await = Some(token);
        Ok(request)
    }

    /// Drops the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn fetch(&self) -> Result<CachedToken, CatalogError> {
        tracing::debug!(url = %self.token_url, "Requesting catalog access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("token request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!(%status, "Catalog rejected client credentials");
            return Err(CatalogError::Unauthorized(format!(
                "token endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(format!("token response: {}", e)))?;
        let token = CachedToken::from_response(body)?;
        tracing::debug!(expires_at = %token.expires_at, "Catalog access token refreshed");
        Ok(token)
    }
}
