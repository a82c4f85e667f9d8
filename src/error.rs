// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot error types.
//!
//! Every variant is fatal for the run: the binary reports it on stderr and
//! exits with status 1.

use crate::config::ConfigError;

/// Error raised by any step of the snapshot pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Token exchange was rejected or returned a malformed body.
    #[error("Strava authorization failed: {0}")]
    Authorization(String),

    /// Activity list request was rejected or returned a malformed body.
    #[error("Strava request failed: {0}")]
    Request(String),

    /// Output directory or file could not be written.
    #[error("Failed to write snapshot: {0}")]
    Persistence(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification of a [`SnapshotError`], used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Request,
    Persistence,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authorization => "authorization_failure",
            ErrorKind::Request => "request_failure",
            ErrorKind::Persistence => "persistence_failure",
            ErrorKind::Config => "config_error",
        }
    }
}

impl SnapshotError {
    /// Message used when Strava answers 429.
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";
    /// Message used when Strava answers 401.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Invalid or expired token";

    pub fn kind(&self) -> ErrorKind {
        match self {
            SnapshotError::Authorization(_) => ErrorKind::Authorization,
            SnapshotError::Request(_) => ErrorKind::Request,
            SnapshotError::Persistence(_) => ErrorKind::Persistence,
            SnapshotError::Config(_) => ErrorKind::Config,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Returns true if Strava rejected the credentials themselves.
    pub fn is_strava_token_error(&self) -> bool {
        match self {
            SnapshotError::Authorization(msg) | SnapshotError::Request(msg) => {
                msg.contains(Self::STRAVA_TOKEN_ERROR)
                    || msg.contains("invalid_grant")
                    || msg.contains("Authorization Error")
            }
            _ => false,
        }
    }

    /// Returns true if Strava throttled the request.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            SnapshotError::Authorization(msg) | SnapshotError::Request(msg) => {
                msg.contains(Self::STRAVA_RATE_LIMIT)
            }
            _ => false,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Persistence(err.to_string())
    }
}

/// Result type alias for pipeline steps.
pub type Result<T> = std::result::Result<T, SnapshotError>;
