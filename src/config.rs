//! Configuration parsing for the Beacon server.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start
//!
//! The service name has no default: telemetry without a service identity is
//! useless, so a missing `OTEL_SERVICE_NAME` aborts startup.

use clap::Parser;

use crate::error::ConfigError;

/// Beacon: an OTLP-instrumented HTTP service.
#[derive(Parser, Debug, Clone)]
#[command(name = "beacon")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "BEACON_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "BEACON_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Service name reported in telemetry resource attributes (required)
    #[arg(long, env = "OTEL_SERVICE_NAME")]
    pub service_name: Option<String>,

    /// OpenTelemetry collector endpoint for OTLP export (optional)
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otel_endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Probability in [0, 1] that the root route fails with an induced error
    #[arg(long, env = "BEACON_FAILURE_RATE", default_value_t = 0.1)]
    pub failure_rate: f64,

    /// Exclusive upper bound in milliseconds for the root route's random delay
    #[arg(long, env = "BEACON_JITTER_MS", default_value_t = 100)]
    pub jitter_ms: u64,

    /// Fixed delay in milliseconds for the delayed route
    #[arg(long, env = "BEACON_DELAY_MS", default_value_t = 5000)]
    pub delay_ms: u64,

    /// Upstream URL proxied by the fetch route
    #[arg(
        long,
        env = "BEACON_UPSTREAM_URL",
        default_value = "https://jsonplaceholder.typicode.com/todos/1"
    )]
    pub upstream_url: String,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The configured service name, or the fatal startup error.
    pub fn service_name(&self) -> Result<&str, ConfigError> {
        self.service_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingServiceName)
    }

    /// Create a default configuration for testing.
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0, // Random port
            service_name: Some("beacon-test".into()),
            otel_endpoint: None,
            log_level: "debug".into(),
            failure_rate: 0.0,
            jitter_ms: 5,
            delay_ms: 50,
            upstream_url: "http://127.0.0.1:1/unreachable".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            service_name: None,
            otel_endpoint: None,
            log_level: "info".into(),
            failure_rate: 0.1,
            jitter_ms: 100,
            delay_ms: 5000,
            upstream_url: "https://jsonplaceholder.typicode.com/todos/1".into(),
        }
    }
}
