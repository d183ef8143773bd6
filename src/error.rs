//! Error taxonomy for handlers and startup.
//!
//! Handler errors are caught at the handler boundary and converted into
//! structured 400 responses; none propagate far enough to crash the
//! process. Startup errors are fatal before the server accepts traffic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors produced by request handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Randomly triggered failure on the root route.
    #[error("induced failure")]
    Induced,

    /// The outbound call on the fetch route failed.
    #[error("outbound request failed: {0}")]
    Outbound(#[from] reqwest::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Fatal configuration errors detected before the server starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No service name was supplied via CLI or environment.
    #[error("service name is required: set OTEL_SERVICE_NAME or pass --service-name")]
    MissingServiceName,
}
