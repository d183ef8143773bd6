//! Tracing subscriber setup.
//!
//! Configures structured logging with:
//! - Console logging with structured format
//! - Environment-based filter (via RUST_LOG)
//! - Optional bridge of `tracing` spans into the OpenTelemetry tracer

use opentelemetry_sdk::trace as sdktrace;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// # Arguments
///
/// * `log_level` - Default filter directive when `RUST_LOG` is unset
/// * `otel_tracer` - Tracer to bridge `tracing` spans into, if exporting
///
/// # Panics
///
/// Panics if a subscriber has already been installed.
pub fn init_tracing(log_level: &str, otel_tracer: Option<sdktrace::Tracer>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},beacon=debug")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);

    match otel_tracer {
        Some(tracer) => registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .init(),
        None => registry.init(),
    }
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}
