#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use rand::{rngs::StdRng, SeedableRng};
use tower::ServiceExt;

use weatherstation_sim::{routes, AppState, ConfigStore, PersistPolicy, SensorSimulator};

/// Build the full application router over a fresh, seeded simulator and a
/// threshold store at `config_path`.
pub fn build_test_app(config_path: &Path, static_dir: &Path) -> (Router, AppState) {
    build_test_app_with_policy(config_path, static_dir, PersistPolicy::BestEffort)
}

pub fn build_test_app_with_policy(
    config_path: &Path,
    static_dir: &Path,
    policy: PersistPolicy,
) -> (Router, AppState) {
    let simulator = Arc::new(SensorSimulator::with_rng(StdRng::seed_from_u64(2024)));
    let store = Arc::new(ConfigStore::load(config_path).with_persist_policy(policy));
    let state = AppState::new(simulator, store);

    (routes::router(state.clone(), static_dir), state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
