//! HTTP server setup and lifecycle.
//!
//! Configures the axum server with:
//! - The five instrumented route handlers
//! - The per-request span middleware on every route
//! - Graceful shutdown support

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::watch;

use crate::config::Config;
use crate::observability::{spans, Telemetry};
use crate::service;

/// Server state shared across handlers.
///
/// Built once before the listener accepts traffic; request-path code only
/// reads from it.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide telemetry handle.
    pub telemetry: Arc<Telemetry>,
    /// Client for outbound calls on the fetch route.
    pub http: reqwest::Client,
    /// Runtime configuration (behavior knobs, upstream URL).
    pub config: Arc<Config>,
}

/// Build the axum router with all routes and the span middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service::root::handle_root))
        .route("/data", post(service::data::handle_data))
        .route("/delay", get(service::delay::handle_delay))
        .route("/log", post(service::log::handle_log))
        .route("/fetch", get(service::fetch::handle_fetch))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            spans::track_request,
        ))
        .with_state(state)
}

/// Run the Beacon HTTP server.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `telemetry` - Initialized telemetry handle
/// * `shutdown_rx` - Receiver for shutdown signal
///
/// # Returns
///
/// Returns when the server has shut down.
pub async fn run_server(
    config: Config,
    telemetry: Arc<Telemetry>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = AppState {
        telemetry,
        http: reqwest::Client::new(),
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting Beacon HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.changed().await;
            tracing::info!("Shutdown signal received, stopping server");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
