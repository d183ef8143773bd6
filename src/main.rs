//! Beacon: an OTLP-instrumented HTTP service.
//!
//! # Usage
//!
//! ```bash
//! OTEL_SERVICE_NAME=beacon beacon --port 3000
//! ```
//!
//! Environment variables can also be used:
//! - `BEACON_HOST` / `BEACON_PORT`: Bind address
//! - `OTEL_SERVICE_NAME`: Service name (required)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint for OTLP export
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::sync::Arc;

use beacon::config::Config;
use beacon::observability::{tracing as obs_tracing, Telemetry};
use beacon::server::run_server;
use tokio::sync::watch;

/// Print startup banner with version and configuration.
fn print_banner(config: &Config, service_name: &str) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
   ___
  | _ ) ___ __ _ __ ___ _ _
  | _ \/ -_) _` / _/ _ \ ' \
  |___/\___\__,_\__\___/_||_|

  Beacon v{} - OTLP-instrumented HTTP service

  Configuration:
    Address:    {}:{}
    Service:    {}
    Collector:  {}
    Log Level:  {}

  Press Ctrl+C to shutdown gracefully.
"#,
        version,
        config.host,
        config.port,
        service_name,
        config.otel_endpoint.as_deref().unwrap_or("(none, recording locally)"),
        config.log_level
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Missing service identity is fatal before anything is served
    let service_name = config.service_name()?.to_owned();

    // Initialize telemetry providers, then the subscriber that bridges
    // tracing spans into them
    let telemetry = Arc::new(Telemetry::init(
        &service_name,
        config.otel_endpoint.as_deref(),
    ));
    obs_tracing::init_tracing(&config.log_level, Some(telemetry.tracer().clone()));

    // Print startup banner
    print_banner(&config, &service_name);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler task
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        // Wait for SIGTERM or SIGINT (Ctrl+C)
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating shutdown...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating shutdown...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.expect("failed to listen for ctrl+c");
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }

        // Signal shutdown
        let _ = shutdown_tx_clone.send(true);
    });

    // Run the server
    run_server(config, telemetry.clone(), shutdown_rx).await?;

    // Flush whatever the exporters still hold
    telemetry.shutdown();

    tracing::info!("Beacon shutdown complete");
    Ok(())
}
