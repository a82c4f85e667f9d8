// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fake of the two Strava endpoints the snapshot uses.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use run_snapshot::config::Credentials;
use run_snapshot::services::{SnapshotBuilder, StravaClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Access token handed out by the fake token endpoint.
pub const FAKE_ACCESS_TOKEN: &str = "fake_access_token";

/// How the fake API should behave.
#[derive(Clone)]
pub struct FakeOptions {
    /// Activities the athlete "has", most recent first
    pub activities: Vec<Value>,
    /// Status for the token endpoint
    pub token_status: StatusCode,
    /// Body returned with a 200 from the token endpoint (None = normal body)
    pub token_body: Option<Value>,
    /// Status for the activities endpoint
    pub list_status: StatusCode,
    /// Body returned with a 200 from the activities endpoint (None = activity page)
    pub list_body: Option<Value>,
    /// Return every activity regardless of `per_page`
    pub ignore_per_page: bool,
}

impl Default for FakeOptions {
    fn default() -> Self {
        Self {
            activities: Vec::new(),
            token_status: StatusCode::OK,
            token_body: None,
            list_status: StatusCode::OK,
            list_body: None,
            ignore_per_page: false,
        }
    }
}

#[derive(Default)]
struct Recorded {
    token_requests: Vec<Value>,
    list_queries: Vec<HashMap<String, String>>,
}

struct FakeState {
    options: FakeOptions,
    recorded: Mutex<Recorded>,
}

/// Running fake Strava server.
pub struct FakeStrava {
    pub base_url: String,
    pub token_url: String,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeStrava {
    /// Start the fake on an ephemeral port.
    pub async fn spawn(options: FakeOptions) -> Self {
        let state = Arc::new(FakeState {
            options,
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .route("/oauth/token", post(token_handler))
            .route("/api/v3/athlete/activities", get(list_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake Strava");
        let addr = listener.local_addr().expect("fake Strava address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}/api/v3", addr),
            token_url: format!("http://{}/oauth/token", addr),
            state,
        }
    }

    /// Token request bodies received so far.
    pub fn token_requests(&self) -> Vec<Value> {
        self.state.recorded.lock().unwrap().token_requests.clone()
    }

    /// Query strings of activity list requests received so far.
    pub fn list_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.recorded.lock().unwrap().list_queries.clone()
    }

    /// Builder pointed at this fake, writing to `output_path`.
    pub fn builder(&self, output_path: &Path) -> SnapshotBuilder {
        SnapshotBuilder::new(
            StravaClient::with_urls(test_credentials(), &self.base_url, &self.token_url),
            output_path,
        )
    }
}

async fn token_handler(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.recorded.lock().unwrap().token_requests.push(body.clone());

    let options = &state.options;
    if options.token_status != StatusCode::OK {
        let error = json!({
            "message": "Bad Request",
            "errors": [{ "resource": "RefreshToken", "field": "refresh_token", "code": "invalid" }]
        });
        return (options.token_status, Json(error)).into_response();
    }

    let response = options.token_body.clone().unwrap_or_else(|| {
        json!({
            "token_type": "Bearer",
            "access_token": FAKE_ACCESS_TOKEN,
            "expires_at": 1_710_500_000,
            "expires_in": 21600,
            "refresh_token": body["refresh_token"],
        })
    });
    (StatusCode::OK, Json(response)).into_response()
}

async fn list_handler(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.recorded.lock().unwrap().list_queries.push(query.clone());

    let options = &state.options;
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", FAKE_ACCESS_TOKEN));
    if !authorized {
        let error = json!({
            "message": "Authorization Error",
            "errors": [{ "resource": "Athlete", "field": "access_token", "code": "invalid" }]
        });
        return (StatusCode::UNAUTHORIZED, Json(error)).into_response();
    }

    if options.list_status != StatusCode::OK {
        return (options.list_status, Json(json!({ "message": "Error" }))).into_response();
    }

    if let Some(body) = &options.list_body {
        return (StatusCode::OK, Json(body.clone())).into_response();
    }

    // Strava defaults to 30 per page
    let per_page = query
        .get("per_page")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(30);
    let page: Vec<Value> = if options.ignore_per_page {
        options.activities.clone()
    } else {
        options.activities.iter().take(per_page).cloned().collect()
    };

    (StatusCode::OK, Json(Value::Array(page))).into_response()
}

#[allow(dead_code)]
pub fn test_credentials() -> Credentials {
    Credentials {
        client_id: "12345".to_string(),
        client_secret: "test_secret".to_string(),
        refresh_token: "test_refresh_token".to_string(),
    }
}

/// A Strava summary activity as returned by `GET /athlete/activities`.
#[allow(dead_code)]
pub fn strava_activity(id: u64, name: &str, activity_type: &str) -> Value {
    json!({
        "resource_state": 2,
        "athlete": { "id": 134815, "resource_state": 1 },
        "name": name,
        "distance": 5200.0,
        "moving_time": 1800,
        "elapsed_time": 1920,
        "total_elevation_gain": 45.0,
        "type": activity_type,
        "sport_type": activity_type,
        "id": id,
        "start_date": "2024-03-15T06:30:00Z",
        "start_date_local": "2024-03-15T14:30:00Z",
        "timezone": "(GMT+08:00) Asia/Shanghai",
        "achievement_count": 0,
        "kudos_count": 3,
        "map": {
            "id": format!("a{}", id),
            "summary_polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
            "resource_state": 2
        },
        "start_latlng": [39.9042, 116.4074],
        "end_latlng": [39.9042, 116.4074],
        "average_speed": 2.89,
        "max_speed": 3.5,
        "has_heartrate": true,
        "average_heartrate": 155.0,
        "max_heartrate": 175.0
    })
}

/// `count` runs with descending ids (most recent first).
#[allow(dead_code)]
pub fn many_runs(count: u64) -> Vec<Value> {
    (0..count)
        .map(|i| strava_activity(10_000 - i, &format!("Run {}", i), "Run"))
        .collect()
}
