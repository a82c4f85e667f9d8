//! Running statistics shown on the dashboard header and monthly chart.
//!
//! Computed from the projected activities after each run and logged; the
//! snapshot file itself only carries the activities.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::FilteredActivity;
use crate::time_utils::{month_key, month_label, parse_start_date, trailing_months};

/// Number of calendar months in the monthly breakdown.
pub const MONTHS_SHOWN: u32 = 6;

/// Aggregate statistics over a set of running activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunningStats {
    // ─── Totals ──────────────────────────────────────────────────
    /// Number of runs in the snapshot
    pub total_runs: u32,
    /// Total distance (kilometers)
    pub total_distance_km: f64,
    /// Total moving time (hours)
    pub total_time_hours: f64,
    /// Total elevation gain (meters)
    pub total_elevation_m: f64,
    /// Runs with a decodable, non-empty route
    pub mapped_runs: u32,

    // ─── Time Series ─────────────────────────────────────────────
    /// Trailing months, oldest first
    pub monthly: Vec<MonthlySummary>,
}

/// One bar/line point of the monthly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// "YYYY-MM"
    pub month: String,
    /// Short month name, e.g. "Mar"
    pub label: String,
    /// Distance in kilometers, one decimal
    pub distance_km: f64,
    /// Average pace in minutes per kilometer, two decimals (0 without distance)
    pub pace_min_per_km: f64,
}

#[derive(Default)]
struct MonthTotals {
    distance_m: f64,
    moving_secs: f64,
}

impl RunningStats {
    /// Aggregate `activities` with the monthly window ending at `now`.
    ///
    /// Missing numeric fields count as zero. Activities whose start date
    /// does not parse are left out of the monthly buckets only.
    pub fn from_activities(activities: &[FilteredActivity], now: DateTime<Utc>) -> Self {
        let mut stats = Self::default();
        let mut by_month: HashMap<String, MonthTotals> = HashMap::new();

        for activity in activities {
            let distance = activity.distance().unwrap_or(0.0);
            let moving = activity.moving_time().unwrap_or(0.0);

            stats.total_runs += 1;
            stats.total_distance_km += distance / 1000.0;
            stats.total_time_hours += moving / 3600.0;
            stats.total_elevation_m += activity.total_elevation_gain().unwrap_or(0.0);

            if matches!(activity.route(), Some(Ok(ref line)) if !line.0.is_empty()) {
                stats.mapped_runs += 1;
            }

            if let Some(start) = activity.start_date().and_then(parse_start_date) {
                let totals = by_month.entry(month_key(start)).or_default();
                totals.distance_m += distance;
                totals.moving_secs += moving;
            }
        }

        stats.monthly = trailing_months(now, MONTHS_SHOWN)
            .into_iter()
            .map(|month| {
                let key = month_key(month);
                let (distance_km, minutes) = by_month
                    .get(&key)
                    .map(|t| (t.distance_m / 1000.0, t.moving_secs / 60.0))
                    .unwrap_or((0.0, 0.0));
                let pace = if distance_km > 0.0 {
                    minutes / distance_km
                } else {
                    0.0
                };

                MonthlySummary {
                    label: month_label(month),
                    month: key,
                    distance_km: round_to(distance_km, 1),
                    pace_min_per_km: round_to(pace, 2),
                }
            })
            .collect();

        stats
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
