//! Liveness endpoint for the dashboard and process supervisors.
//!
//! Does not touch the sensor or the threshold store; it only reports that
//! the process is up, for how long, and which build is running.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::AppState;

/// JSON response body for the `/api/status` endpoint.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    /// Seconds since the service started.
    uptime: f64,
    timestamp: String,
    version: &'static str,
}

/// Handle `GET /api/status`.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create a subrouter containing the `/api/status` route.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/status", get(status))
}
