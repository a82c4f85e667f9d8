// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity records: the untyped list entries and the fixed
//! projection written to the dashboard snapshot.
//!
//! Field values are carried through as received. Nothing is defaulted or
//! type-checked, so an activity with a missing or oddly shaped field still
//! lands in the snapshot with that field absent or unchanged.

use geo::LineString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Activity `type` kept in the snapshot.
pub const RUN_TYPE: &str = "Run";

/// Top-level fields copied from a raw activity, in output order.
pub const PROJECTED_FIELDS: [&str; 14] = [
    "id",
    "name",
    "distance",
    "moving_time",
    "elapsed_time",
    "total_elevation_gain",
    "start_date",
    "average_speed",
    "max_speed",
    "average_heartrate",
    "max_heartrate",
    "start_latlng",
    "end_latlng",
    "map",
];

const MAP_FIELD: &str = "map";
const POLYLINE_FIELD: &str = "summary_polyline";

/// One entry of `GET /athlete/activities`, schema owned by Strava.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawActivity(Map<String, Value>);

impl RawActivity {
    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Legacy activity category (`"Run"`, `"Ride"`, ...).
    pub fn activity_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn is_run(&self) -> bool {
        self.activity_type() == Some(RUN_TYPE)
    }
}

impl From<Map<String, Value>> for RawActivity {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Dashboard record derived from exactly one [`RawActivity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilteredActivity(Map<String, Value>);

impl FilteredActivity {
    /// Project a raw activity onto the fixed snapshot field list.
    pub fn project(raw: &RawActivity) -> Self {
        let mut fields = Map::new();

        for name in PROJECTED_FIELDS {
            if let Some(value) = raw.get(name) {
                fields.insert(name.to_string(), value.clone());
            }
        }

        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Distance in meters.
    pub fn distance(&self) -> Option<f64> {
        self.number("distance")
    }

    /// Moving time in seconds.
    pub fn moving_time(&self) -> Option<f64> {
        self.number("moving_time")
    }

    /// Elevation gain in meters.
    pub fn total_elevation_gain(&self) -> Option<f64> {
        self.number("total_elevation_gain")
    }

    pub fn average_heartrate(&self) -> Option<f64> {
        self.number("average_heartrate")
    }

    /// Start time as sent by Strava (ISO 8601, UTC).
    pub fn start_date(&self) -> Option<&str> {
        self.0.get("start_date").and_then(Value::as_str)
    }

    pub fn summary_polyline(&self) -> Option<&str> {
        self.0
            .get(MAP_FIELD)
            .and_then(|map| map.get(POLYLINE_FIELD))
            .and_then(Value::as_str)
    }

    /// Distance formatted in kilometers, e.g. `"5.20"`.
    pub fn distance_km_display(&self) -> Option<String> {
        self.distance().map(|m| format!("{:.2}", m / 1000.0))
    }

    /// Moving time formatted as `m:ss`; minutes are not wrapped into hours.
    pub fn moving_time_display(&self) -> Option<String> {
        let secs = self.moving_time()?.max(0.0) as u64;
        Some(format!("{}:{:02}", secs / 60, secs % 60))
    }

    /// Decode the summary polyline (precision 5).
    ///
    /// Returns `None` when the activity has no route.
    pub fn route(&self) -> Option<Result<LineString<f64>, RouteError>> {
        let encoded = self.summary_polyline().filter(|p| !p.is_empty())?;
        Some(
            polyline::decode_polyline(encoded, 5)
                .map_err(|e| RouteError::Polyline(e.to_string())),
        )
    }

    fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }
}

/// Keep running activities and project them, preserving input order.
pub fn filter_and_project(raw: &[RawActivity]) -> Vec<FilteredActivity> {
    raw.iter()
        .filter(|activity| activity.is_run())
        .map(FilteredActivity::project)
        .collect()
}

/// The document written to disk: `{ "activities": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub activities: Vec<FilteredActivity>,
}

/// Errors from route decoding.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Failed to decode polyline: {0}")]
    Polyline(String),
}
