//! OAuth2 refresh-token grant with a cached access token.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

const REFRESH_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid token url: {0}")]
    Url(#[from] url::ParseError),
    #[error("token endpoint returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    access_token: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .is_none_or(|expires_at| Instant::now() + REFRESH_SKEW < expires_at)
    }
}

/// Hands out access tokens, refreshing them shortly before they expire.
pub struct TokenSource {
    http: Client,
    token_url: Url,
    credentials: OAuthCredentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn with_token_url(
        token_url: &str,
        credentials: OAuthCredentials,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            http: Client::new(),
            token_url: Url::parse(token_url)?,
            credentials,
            cached: Mutex::new(None),
        })
    }

    /// Concurrent callers wait on a single refresh instead of racing.
    pub async fn access_token(&self) -> Result<String, TokenError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.access_token.clone());
        }
        let token = self.refresh().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn refresh(&self) -> Result<CachedToken, TokenError> {
        let credentials = &self.credentials;
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];
        if let Some(redirect_uri) = credentials.redirect_uri.as_deref() {
            form.push(("redirect_uri", redirect_uri));
        }

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Api { status, body });
        }
        let token: TokenResponse = response.json().await?;
        debug!(expires_in = ?token.expires_in, "refreshed access token");
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}
