//! Log emission route.

use axum::extract::State;
use axum::Json;
use opentelemetry::logs::Severity;
use serde::Deserialize;
use serde_json::Value;

use crate::observability::logs::json_object_to_attributes;
use crate::server::AppState;

/// Body accepted by the log route.
#[derive(Debug, Deserialize, Default)]
pub struct LogRequest {
    /// Message interpolated into the record body.
    #[serde(default)]
    pub msg: Option<String>,
    /// Free-form attribute payload.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Handle `POST /log`.
///
/// Emits one structured log record built from the request body and
/// acknowledges unconditionally; the response does not depend on the
/// emission outcome. No instruments are touched on this route.
pub async fn handle_log(
    State(state): State<AppState>,
    body: Option<Json<LogRequest>>,
) -> &'static str {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let msg = request.msg.unwrap_or_default();
    let attributes = request
        .data
        .as_ref()
        .map(json_object_to_attributes)
        .unwrap_or_default();

    state
        .telemetry
        .emit_log(Severity::Warn2, format!("Log {msg}"), attributes);

    "OK"
}
