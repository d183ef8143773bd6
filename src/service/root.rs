//! Root route: jittered response with induced failures.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use rand::Rng;
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::observability::metrics::InFlightGuard;
use crate::server::AppState;

/// Handle `GET /`.
///
/// Sleeps a random duration below the configured jitter bound, then fails
/// with an induced error at the configured rate. Both outcomes leave the
/// in-flight gauge where it started.
#[tracing::instrument(skip_all)]
pub async fn handle_root(State(state): State<AppState>) -> Result<Json<Value>, ServiceError> {
    let metrics = &state.telemetry.metrics;
    metrics.http_requests.add(1, &[]);
    let guard = InFlightGuard::acquire(&metrics.active_requests);

    // The RNG is not held across await points.
    let jitter = {
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(0..state.config.jitter_ms.max(1)))
    };
    tokio::time::sleep(jitter).await;

    let (failed, message) = {
        let mut rng = rand::thread_rng();
        (
            rng.gen::<f64>() < state.config.failure_rate,
            rng.gen::<f64>() * 10.0,
        )
    };
    if failed {
        // The guard decrements the gauge on this path too.
        return Err(ServiceError::Induced);
    }

    drop(guard);
    Ok(Json(json!({ "message": message })))
}
