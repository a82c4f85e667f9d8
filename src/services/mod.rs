// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Strava access and the snapshot pipeline.

pub mod snapshot;
pub mod strava;

pub use snapshot::{SnapshotBuilder, SnapshotReport};
pub use strava::{AccessToken, StravaClient};
