// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the snapshot run.
//!
//! Handles:
//! - Refresh-token exchange for a short-lived access token
//! - Listing the athlete's most recent activities (single page)
//! - Rate limit and rejected-token detection in error messages

use crate::config::{Config, Credentials};
use crate::error::{Result, SnapshotError};
use crate::models::RawActivity;
use serde::Deserialize;

/// Short-lived bearer token; lives for a single run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    credentials: Credentials,
}

impl StravaClient {
    /// Create a client against explicit endpoints.
    pub fn with_urls(
        credentials: Credentials,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token_url: token_url.into(),
            credentials,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_urls(
            config.credentials.clone(),
            config.api_base_url.clone(),
            config.token_url.clone(),
        )
    }

    /// Exchange the stored refresh token for an access token.
    ///
    /// POST https://www.strava.com/oauth/token
    pub async fn refresh_token(&self) -> Result<TokenRefreshResponse> {
        let body = serde_json::json!({
            "client_id": self.credentials.client_id,
            "client_secret": self.credentials.client_secret,
            "refresh_token": self.credentials.refresh_token,
            "grant_type": "refresh_token",
        });

        let response = self
            .http
            .post(&self.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                SnapshotError::Authorization(format!("Token refresh request failed: {}", e))
            })?;

        let tokens: TokenRefreshResponse =
            check_response_json(response, SnapshotError::Authorization).await?;

        if tokens
            .refresh_token
            .as_deref()
            .is_some_and(|t| t != self.credentials.refresh_token)
        {
            tracing::warn!("Strava rotated the refresh token; update STRAVA_REFRESH_TOKEN");
        }

        Ok(tokens)
    }

    /// List the athlete's activities, most recent first (first page only).
    ///
    /// GET https://www.strava.com/api/v3/athlete/activities?per_page={per_page}
    pub async fn list_activities(
        &self,
        access_token: &AccessToken,
        per_page: u32,
    ) -> Result<Vec<RawActivity>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token.as_str())
            .query(&[("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| SnapshotError::Request(e.to_string()))?;

        check_response_json(response, SnapshotError::Request).await
    }
}

/// Check response status and parse the JSON body.
///
/// `fail` picks the error variant for the calling step.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    fail: fn(String) -> SnapshotError,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Rate limit - reported, never retried
        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(fail(SnapshotError::STRAVA_RATE_LIMIT.to_string()));
        }

        // Unauthorized - refresh token revoked or access token rejected
        if status.as_u16() == 401 {
            return Err(fail(format!(
                "{} (HTTP {}): {}",
                SnapshotError::STRAVA_TOKEN_ERROR,
                status,
                body
            )));
        }

        return Err(fail(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| fail(format!("JSON parse error: {}", e)))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl TokenRefreshResponse {
    pub fn into_access_token(self) -> AccessToken {
        AccessToken(self.access_token)
    }
}
