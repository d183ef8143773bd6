//! Fixed-delay route.

use std::time::{Duration, Instant};

use axum::extract::State;
use opentelemetry::KeyValue;

use crate::observability::metrics::{elapsed_ms, InFlightGuard};
use crate::server::AppState;

/// Handle `GET /delay`.
///
/// Sleeps the configured fixed delay and answers with a static body. The
/// in-flight gauge is decremented before the duration sample is recorded;
/// that ordering is part of the route's contract.
#[tracing::instrument(skip_all)]
pub async fn handle_delay(State(state): State<AppState>) -> &'static str {
    let start = Instant::now();
    let metrics = &state.telemetry.metrics;
    metrics.http_requests.add(1, &[]);
    let guard = InFlightGuard::acquire(&metrics.active_requests);

    tokio::time::sleep(Duration::from_millis(state.config.delay_ms)).await;

    guard.release();
    metrics.request_duration.record(
        elapsed_ms(start),
        &[
            KeyValue::new("method", "GET"),
            KeyValue::new("status", 200_i64),
        ],
    );

    "hello"
}
