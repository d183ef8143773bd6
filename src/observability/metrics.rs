//! OTLP metrics registry.
//!
//! Key metrics:
//! - beacon_http_requests_total: Counter for received HTTP requests
//! - beacon_http_active_requests: UpDownCounter for in-flight requests
//! - beacon_request_duration_ms: Histogram for timed request operations

use std::time::Instant;

use opentelemetry::metrics::{Counter, Histogram, Meter, UpDownCounter};

/// Beacon metrics registry.
///
/// Created once at startup from a single meter and shared across all
/// concurrent requests via server state. Handlers never create
/// instruments; the OpenTelemetry SDK merges same-named instruments into
/// one stream, so the registry is the only writer path.
#[derive(Debug)]
pub struct Metrics {
    /// Total number of HTTP requests received.
    pub http_requests: Counter<u64>,
    /// Number of in-flight requests.
    pub active_requests: UpDownCounter<i64>,
    /// Histogram of timed request operations in milliseconds.
    pub request_duration: Histogram<f64>,
}

impl Metrics {
    /// Create the metrics registry from a meter.
    pub fn new(meter: &Meter) -> Self {
        Self {
            http_requests: meter
                .u64_counter("beacon_http_requests_total")
                .with_description("Total number of HTTP requests received")
                .with_unit("{requests}")
                .init(),
            active_requests: meter
                .i64_up_down_counter("beacon_http_active_requests")
                .with_description("Number of in-flight requests")
                .with_unit("{requests}")
                .init(),
            request_duration: meter
                .f64_histogram("beacon_request_duration_ms")
                .with_description("Duration of timed request operations")
                .with_unit("ms")
                .init(),
        }
    }
}

/// Scoped in-flight accounting.
///
/// `acquire` increments the gauge; the matching decrement happens exactly
/// once, either through an explicit [`InFlightGuard::release`] or when the
/// guard is dropped. Early returns and error paths therefore cannot leak an
/// in-flight count.
#[derive(Debug)]
pub struct InFlightGuard {
    counter: UpDownCounter<i64>,
    armed: bool,
}

impl InFlightGuard {
    /// Increment the gauge and return the guard holding the decrement.
    pub fn acquire(counter: &UpDownCounter<i64>) -> Self {
        counter.add(1, &[]);
        Self {
            counter: counter.clone(),
            armed: true,
        }
    }

    /// Decrement the gauge now instead of at drop.
    ///
    /// Used where the decrement must be ordered before another instrument
    /// records.
    pub fn release(mut self) {
        self.decrement();
    }

    fn decrement(&mut self) {
        if self.armed {
            self.armed = false;
            self.counter.add(-1, &[]);
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.decrement();
    }
}

/// Milliseconds elapsed since `start`, as recorded into duration histograms.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
