//! Route gateway (EMBP): each sibling file exports one subrouter and this
//! module assembles them, together with static files and the 404 / panic
//! handling shared by every route.

use std::{any::Any, path::Path};

use axum::{
    handler::HandlerWithoutStateExt,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::{ApiError, AppState};

mod history;
mod limits;
mod status;
mod weather;

// ---

pub fn router(state: AppState, static_dir: &Path) -> Router {
    // ---
    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .merge(weather::router())
        .merge(limits::router())
        .merge(status::router())
        .merge(history::router())
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    // ---
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
