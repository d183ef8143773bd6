//! OpenTelemetry observability infrastructure.
//!
//! Provides:
//! - One-time telemetry bootstrap with OTLP export
//! - The shared metric registry and in-flight guard
//! - Per-request span emission and structured log records
//! - Structured console logging

pub mod logs;
pub mod metrics;
pub mod spans;
pub mod telemetry;
pub mod tracing;

pub use telemetry::Telemetry;
