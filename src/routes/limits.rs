use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{ApiResult, AppState, ConfigError, LimitsUpdate, ThresholdConfig};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/limits", post(handler))
}

#[derive(Debug, Serialize)]
struct LimitsResponse {
    success: bool,
    message: &'static str,
    config: ThresholdConfig,
}

/// Validate and store new temperature limits and offset.
///
/// A body that is not a JSON object is treated the same as one whose fields
/// are not numbers.
async fn handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<LimitsResponse>> {
    // ---
    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "POST /api/limits - Unusable body");
        ConfigError::InvalidInput
    })?;
    let update = LimitsUpdate::from_json(&body);

    let config = state.store.update(&update).await?;
    info!(?config, "POST /api/limits - Settings saved");

    Ok(Json(LimitsResponse {
        success: true,
        message: "Settings saved successfully",
        config,
    }))
}
