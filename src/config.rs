// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot configuration loaded from environment variables.
//!
//! Read exactly once at startup and handed to the builder; nothing below
//! `main` touches the environment.

use reqwest::Url;
use std::env;
use std::path::PathBuf;

/// Default location of the snapshot consumed by the dashboard.
pub const DEFAULT_OUTPUT_PATH: &str = "public/data/activities.json";
/// Strava REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://www.strava.com/api/v3";
/// Strava OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// OAuth credentials used for the refresh-token grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Snapshot configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava app credentials and the athlete's refresh token
    pub credentials: Credentials,
    /// Where the snapshot JSON is written
    pub output_path: PathBuf,
    /// Strava API root (overridable for tests)
    pub api_base_url: String,
    /// Strava OAuth token endpoint (overridable for tests)
    pub token_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            credentials: Credentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                refresh_token: "test_refresh_token".to_string(),
            },
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials are not rejected here; Strava will refuse the
    /// token exchange and the run fails with an authorization error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials {
            client_id: credential_var(&lookup, "STRAVA_CLIENT_ID"),
            client_secret: credential_var(&lookup, "STRAVA_CLIENT_SECRET"),
            refresh_token: credential_var(&lookup, "STRAVA_REFRESH_TOKEN"),
        };

        let api_base_url =
            lookup("STRAVA_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let token_url =
            lookup("STRAVA_OAUTH_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string());

        Ok(Self {
            credentials,
            output_path: lookup("SNAPSHOT_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            api_base_url: validate_url("STRAVA_API_BASE_URL", api_base_url)?,
            token_url: validate_url("STRAVA_OAUTH_TOKEN_URL", token_url)?,
        })
    }
}

/// Read a credential, trimming stray whitespace from secret bindings.
fn credential_var<F>(lookup: &F, name: &'static str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().to_string(),
        None => {
            tracing::warn!(var = name, "Credential not set, sending empty value");
            String::new()
        }
    }
}

fn validate_url(name: &'static str, value: String) -> Result<String, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl(name, e.to_string()))?;
    Ok(value.trim_end_matches('/').to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not a valid URL: {1}")]
    InvalidUrl(&'static str, String),
}
