//! Outbound fetch route.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use opentelemetry::KeyValue;
use serde_json::Value;

use crate::error::ServiceError;
use crate::observability::metrics::elapsed_ms;
use crate::server::AppState;

/// Handle `GET /fetch`.
///
/// Proxies the configured upstream document. Exactly one duration sample
/// is recorded per request, on success and on failure alike, before any
/// failure propagates to the response.
#[tracing::instrument(skip_all)]
pub async fn handle_fetch(State(state): State<AppState>) -> Result<Json<Value>, ServiceError> {
    let start = Instant::now();

    let result = fetch_upstream(&state).await;

    state.telemetry.metrics.request_duration.record(
        elapsed_ms(start),
        &[
            KeyValue::new("method", "GET"),
            KeyValue::new("status", 200_i64),
        ],
    );

    result.map(Json)
}

async fn fetch_upstream(state: &AppState) -> Result<Value, ServiceError> {
    let response = state
        .http
        .get(&state.config.upstream_url)
        .send()
        .await?
        .error_for_status()?;
    let payload = response.json::<Value>().await?;
    Ok(payload)
}
