//! Beacon: an OTLP-instrumented HTTP service.
//!
//! Beacon serves five small HTTP routes whose only purpose is to emit
//! correctly-shaped telemetry for every inbound request: request counters,
//! an in-flight gauge, latency histograms, a span per request, and
//! structured log records, exported via OTLP to a collector.
//!
//! # Architecture
//!
//! - **Instrumented routes**: every request flows through a span middleware
//!   and touches a shared, process-wide metric registry
//! - **Guaranteed accounting**: the in-flight gauge is decremented on every
//!   exit path via a drop guard
//! - **OTLP export**: metrics, traces, and logs ship to a configured
//!   collector endpoint; without one they are recorded locally
//! - **Injectable behavior**: failure rate, delays, and the upstream URL
//!   come from configuration so tests can force every branch
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`error`]: handler and startup error taxonomy
//! - [`observability`]: telemetry bootstrap, metric registry, span and log
//!   emission
//! - [`server`]: axum router and server lifecycle
//! - [`service`]: HTTP route handlers

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // observability::metrics::Metrics is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc,      // Error docs can be verbose
    clippy::missing_panics_doc       // Panic docs can be verbose
)]

pub mod config;
pub mod error;
pub mod observability;
pub mod server;
pub mod service;
