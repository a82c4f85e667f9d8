// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Months, Utc};

/// Parse a Strava `start_date` (RFC3339, usually with a `Z` suffix).
pub fn parse_start_date(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar month key, e.g. `"2024-03"`.
pub fn month_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}

/// Short month label, e.g. `"Mar"`.
pub fn month_label(date: DateTime<Utc>) -> String {
    date.format("%b").to_string()
}

/// The `count` calendar months ending with the month of `now`, oldest first.
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<DateTime<Utc>> {
    (0..count)
        .rev()
        .filter_map(|i| now.checked_sub_months(Months::new(i)))
        .collect()
}
