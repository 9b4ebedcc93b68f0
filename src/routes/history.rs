use axum::{
    extract::Query,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::{history, AppState, HistoryPoint};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/history", get(handler))
}

/// Raw query string; parsed leniently by [`history::parse_hours`].
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    hours: Option<String>,
}

async fn handler(Query(params): Query<HistoryQuery>) -> Json<Vec<HistoryPoint>> {
    // ---
    let hours = history::parse_hours(params.hours.as_deref());
    let points = history::synthesize(hours, Utc::now(), &mut rand::rng());
    debug!(hours, points = points.len(), "GET /api/history - Synthesized series");
    Json(points)
}
