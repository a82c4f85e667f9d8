// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot pipeline.
//!
//! Handles the core workflow:
//! 1. Exchange the refresh token for an access token
//! 2. Fetch the most recent page of activities
//! 3. Keep runs and project them onto the snapshot fields
//! 4. Write `{ "activities": [...] }` to the output path
//!
//! Each step must succeed before the next starts. Nothing is retried, and a
//! failure before step 4 leaves any previous snapshot untouched.

use crate::config::Config;
use crate::error::{Result, SnapshotError};
use crate::models::{filter_and_project, FilteredActivity, RawActivity, RunningStats, Snapshot};
use crate::services::strava::{AccessToken, StravaClient};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Activities requested from Strava. Later activities are not fetched.
pub const PAGE_SIZE: u32 = 100;

/// Builds the dashboard snapshot from the athlete's Strava activities.
pub struct SnapshotBuilder {
    client: StravaClient,
    output_path: PathBuf,
}

impl SnapshotBuilder {
    pub fn new(client: StravaClient, output_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_path: output_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(StravaClient::from_config(config), config.output_path.clone())
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run the whole pipeline once.
    pub async fn run(&self) -> Result<SnapshotReport> {
        let access_token = self.acquire_token().await?;
        let raw = self.list_activities(&access_token).await?;

        let activities = filter_and_project(&raw);
        tracing::info!(
            fetched = raw.len(),
            kept = activities.len(),
            "Filtered running activities"
        );

        self.persist(&activities).await?;

        let stats = RunningStats::from_activities(&activities, chrono::Utc::now());
        tracing::info!(
            runs = stats.total_runs,
            distance_km = %format!("{:.1}", stats.total_distance_km),
            time_hours = %format!("{:.1}", stats.total_time_hours),
            elevation_m = stats.total_elevation_m,
            mapped_runs = stats.mapped_runs,
            "Running statistics"
        );
        for month in &stats.monthly {
            tracing::debug!(
                month = %month.month,
                distance_km = month.distance_km,
                pace_min_per_km = month.pace_min_per_km,
                "Monthly summary"
            );
        }

        Ok(SnapshotReport {
            fetched: raw.len(),
            saved: activities.len(),
            output_path: self.output_path.clone(),
            stats,
        })
    }

    /// Exchange the refresh token for this run's access token.
    pub async fn acquire_token(&self) -> Result<AccessToken> {
        let tokens = self.client.refresh_token().await?;
        tracing::info!(expires_at = ?tokens.expires_at, "Access token acquired");
        Ok(tokens.into_access_token())
    }

    /// Fetch the first page of activities, most recent first.
    ///
    /// A response longer than [`PAGE_SIZE`] is cut to its first entries.
    pub async fn list_activities(&self, access_token: &AccessToken) -> Result<Vec<RawActivity>> {
        let mut activities = self.client.list_activities(access_token, PAGE_SIZE).await?;

        if activities.len() > PAGE_SIZE as usize {
            tracing::warn!(
                returned = activities.len(),
                page_size = PAGE_SIZE,
                "Strava returned more activities than requested, truncating"
            );
            activities.truncate(PAGE_SIZE as usize);
        }

        tracing::info!(count = activities.len(), "Fetched activities");
        Ok(activities)
    }

    /// Write the snapshot, replacing any previous file.
    pub async fn persist(&self, activities: &[FilteredActivity]) -> Result<()> {
        write_snapshot(&self.output_path, activities).await?;
        tracing::info!(
            path = %self.output_path.display(),
            count = activities.len(),
            "Snapshot written"
        );
        Ok(())
    }
}

/// Serialize the snapshot document (pretty-printed, two-space indent).
pub fn render_snapshot(activities: &[FilteredActivity]) -> Result<Vec<u8>> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        activities: &'a [FilteredActivity],
    }

    serde_json::to_vec_pretty(&SnapshotRef { activities })
        .map_err(|e| SnapshotError::Persistence(format!("Failed to serialize snapshot: {}", e)))
}

/// Write the snapshot to `path`, creating parent directories.
///
/// The document goes to a uniquely named temp file in the same directory
/// and is renamed into place, so readers never see a half-written snapshot.
/// Concurrent runs are not coordinated; the last rename wins. The temp file
/// is removed if writing or renaming fails.
pub async fn write_snapshot(path: &Path, activities: &[FilteredActivity]) -> Result<()> {
    let payload = render_snapshot(activities)?;

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_error(parent, e))?;
            parent.to_path_buf()
        }
        None => PathBuf::from("."),
    };

    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&dir, &target, &payload))
        .await
        .map_err(|e| SnapshotError::Persistence(format!("Snapshot writer task failed: {}", e)))?
}

/// Write `payload` to a fresh temp file in `dir`, then rename it to `path`.
///
/// Dropping the `NamedTempFile` on any error path deletes it.
fn replace_file(dir: &Path, path: &Path, payload: &[u8]) -> Result<()> {
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| persistence_error(dir, e))?;

    temp.write_all(payload)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| persistence_error(temp.path(), e))?;

    // Temp files are created 0600; the dashboard needs a world-readable file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| persistence_error(temp.path(), e))?;
    }

    temp.persist(path)
        .map_err(|e| persistence_error(path, e.error))?;
    Ok(())
}

/// Read a snapshot back from disk.
pub async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| persistence_error(path, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SnapshotError::Persistence(format!("{}: {}", path.display(), e)))
}

fn persistence_error(path: &Path, err: std::io::Error) -> SnapshotError {
    SnapshotError::Persistence(format!("{}: {}", path.display(), err))
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct SnapshotReport {
    /// Activities returned by Strava
    pub fetched: usize,
    /// Running activities written to the snapshot
    pub saved: usize,
    pub output_path: PathBuf,
    pub stats: RunningStats,
}
