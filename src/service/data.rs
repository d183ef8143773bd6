//! Data echo route.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::server::AppState;

/// Handle `POST /data`.
///
/// Echoes the `data` field of a JSON object body. Any other body — absent,
/// unparsable, non-object, or lacking the key — gets the placeholder. A
/// `data` key holding `null` still counts as present.
pub async fn handle_data(State(state): State<AppState>, body: Option<Json<Value>>) -> Json<Value> {
    state.telemetry.metrics.http_requests.add(1, &[]);

    let message = body
        .and_then(|Json(value)| match value {
            Value::Object(mut map) => map.remove("data"),
            _ => None,
        })
        .unwrap_or_else(|| Value::String("No Data".into()));

    Json(json!({ "message": message }))
}
