// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! run-snapshot: refresh the static running-activity snapshot
//!
//! This crate exchanges a stored Strava refresh token for an access token,
//! fetches the athlete's most recent activities, keeps the runs, and writes
//! them as the JSON document read by the running dashboard.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use config::Config;
pub use error::{Result, SnapshotError};
pub use services::{SnapshotBuilder, SnapshotReport};
