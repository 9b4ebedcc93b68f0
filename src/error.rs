//! Error types for the threshold store and the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failures of [`crate::ConfigStore::update`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parameters min, max and offset must all be numbers")]
    InvalidInput,

    #[error("Minimum temperature must be lower than maximum temperature")]
    InvalidRange,

    #[error("Offset must be between -10°C and +10°C")]
    InvalidOffset,

    #[error("Failed to persist threshold config: {0}")]
    Persistence(String),
}

impl ConfigError {
    /// Machine-readable code returned next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidInput => "INVALID_INPUT",
            ConfigError::InvalidRange => "INVALID_RANGE",
            ConfigError::InvalidOffset => "INVALID_OFFSET",
            ConfigError::Persistence(_) => "PERSISTENCE_FAILURE",
        }
    }
}

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Only validation failures carry their message to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Route not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Config(err @ ConfigError::Persistence(detail)) => {
                tracing::error!(error = %detail, "Threshold config persistence failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.code(),
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Config(err) => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
