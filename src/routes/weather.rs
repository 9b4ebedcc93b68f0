use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::{AppState, WeatherReport};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/weather", get(handler))
}

/// Current rounded reading next to the configured thresholds.
///
/// The two are read independently; the offset is reported, not applied.
async fn handler(State(state): State<AppState>) -> Json<WeatherReport> {
    // ---
    let report = WeatherReport::new(state.simulator.snapshot(), state.store.current());
    debug!(?report, "GET /api/weather - Sending reading");
    Json(report)
}
