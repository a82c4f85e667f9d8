// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the snapshot.

pub mod activity;
pub mod stats;

pub use activity::{filter_and_project, FilteredActivity, RawActivity, RouteError, Snapshot};
pub use stats::{MonthlySummary, RunningStats};
