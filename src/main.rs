// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! run-snapshot
//!
//! Refreshes `public/data/activities.json` with the athlete's recent Strava
//! runs. Takes no arguments; exits 0 on success and 1 on any failure.

use run_snapshot::{Config, SnapshotBuilder, SnapshotError, SnapshotReport};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Structured JSON logs on stderr; stdout carries only the result line
    init_logging();

    match run().await {
        Ok(report) => {
            println!("Successfully saved {} activities", report.saved);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(kind = err.kind().as_str(), error = %err, "Snapshot failed");
            eprintln!("Error fetching activities: {}", err);
            if let Some(hint) = failure_hint(&err) {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run() -> Result<SnapshotReport, SnapshotError> {
    // Credentials are read once here and passed down explicitly
    let config = Config::from_env()?;
    tracing::info!(
        output = %config.output_path.display(),
        api = %config.api_base_url,
        "Starting activity snapshot"
    );

    SnapshotBuilder::from_config(&config).run().await
}

/// Operator guidance for failures that have a known remedy.
fn failure_hint(err: &SnapshotError) -> Option<&'static str> {
    if err.is_strava_token_error() {
        Some("Strava rejected the credentials; check STRAVA_CLIENT_ID, STRAVA_CLIENT_SECRET and STRAVA_REFRESH_TOKEN")
    } else if err.is_rate_limited() {
        Some("Strava rate limit reached; run again after the 15-minute window resets")
    } else {
        None
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("run_snapshot=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
