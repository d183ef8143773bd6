//! Telemetry bootstrap and lifecycle.
//!
//! Builds the three OpenTelemetry providers (metrics, traces, logs) once at
//! startup. With `OTEL_EXPORTER_OTLP_ENDPOINT` configured, signals are
//! exported over OTLP/gRPC; without it they are recorded against local
//! providers and dropped, so the request path behaves identically either
//! way. A failed exporter build falls back to the local provider instead of
//! aborting startup.

use std::time::Duration;

use opentelemetry::logs::{AnyValue, LogRecord as _, Logger as _, LoggerProvider as _, Severity};
use opentelemetry::metrics::MeterProvider as _;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, Key, KeyValue};
use opentelemetry_sdk::logs::{BatchLogProcessor, Logger as SdkLogger, LoggerProvider};
use opentelemetry_sdk::metrics::{ManualReader, SdkMeterProvider};
use opentelemetry_sdk::trace as sdktrace;
use opentelemetry_sdk::{runtime, Resource};

use super::metrics::Metrics;

/// Export interval for the periodic OTLP metric reader.
const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Instrumentation scope name shared by all three signals.
const SCOPE: &str = "beacon";

/// Process-wide telemetry handle.
///
/// Initialized exactly once before any request is served and passed to
/// handlers through server state; request-path code never reinitializes
/// providers or creates instruments.
#[derive(Debug)]
pub struct Telemetry {
    /// Shared instrument registry.
    pub metrics: Metrics,
    tracer: sdktrace::Tracer,
    logger: SdkLogger,
    meter_provider: SdkMeterProvider,
    tracer_provider: sdktrace::TracerProvider,
    logger_provider: LoggerProvider,
}

impl Telemetry {
    /// Initialize telemetry for the given service identity.
    ///
    /// Also installs the meter and tracer providers globally so that
    /// instrumented third-party code exports through the same pipeline.
    pub fn init(service_name: &str, otel_endpoint: Option<&str>) -> Self {
        let resource = Resource::new([
            KeyValue::new("service.name", service_name.to_owned()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);

        let meter_provider = match otel_endpoint {
            Some(endpoint) => otlp_meter_provider(endpoint, resource.clone()),
            None => local_meter_provider(resource.clone()),
        };
        let tracer_provider = build_tracer_provider(otel_endpoint, resource.clone());
        let logger_provider = build_logger_provider(otel_endpoint, resource);

        global::set_meter_provider(meter_provider.clone());
        global::set_tracer_provider(tracer_provider.clone());

        Self::from_providers(meter_provider, tracer_provider, logger_provider)
    }

    /// Assemble a telemetry handle from prebuilt providers.
    ///
    /// This is the seam tests use to attach in-memory exporters; `init`
    /// goes through it as well.
    pub fn from_providers(
        meter_provider: SdkMeterProvider,
        tracer_provider: sdktrace::TracerProvider,
        logger_provider: LoggerProvider,
    ) -> Self {
        let metrics = Metrics::new(&meter_provider.meter(SCOPE));
        let tracer = tracer_provider.tracer(SCOPE);
        let logger = logger_provider.logger(SCOPE);
        Self {
            metrics,
            tracer,
            logger,
            meter_provider,
            tracer_provider,
            logger_provider,
        }
    }

    /// Tracer used for per-request spans.
    pub fn tracer(&self) -> &sdktrace::Tracer {
        &self.tracer
    }

    /// Emit one structured log record, fire-and-forget.
    ///
    /// Never blocks the caller and never surfaces emitter failures; a
    /// dropped record is the SDK's problem, not the request handler's.
    pub fn emit_log(&self, severity: Severity, body: impl Into<AnyValue>, attributes: Vec<(Key, AnyValue)>) {
        let mut record = self.logger.create_log_record();
        record.set_severity_number(severity);
        record.set_body(body.into());
        for (key, value) in attributes {
            record.add_attribute(key, value);
        }
        self.logger.emit(record);
    }

    /// Flush and shut down all providers.
    ///
    /// Called once on process exit, after the server has stopped. Failures
    /// are logged and swallowed.
    pub fn shutdown(&self) {
        if let Err(err) = self.meter_provider.shutdown() {
            tracing::warn!(error = %err, "Failed to shut down meter provider");
        }
        let _ = self.logger_provider.shutdown();
        let _ = self.tracer_provider.force_flush();
        global::shutdown_tracer_provider();
    }
}

/// OTLP metric provider with a periodic reader.
fn otlp_meter_provider(endpoint: &str, resource: Resource) -> SdkMeterProvider {
    use opentelemetry_otlp::{Protocol, WithExportConfig};

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint)
        .with_protocol(Protocol::Grpc);

    match opentelemetry_otlp::new_pipeline()
        .metrics(runtime::Tokio)
        .with_exporter(exporter)
        .with_resource(resource.clone())
        .with_period(METRIC_EXPORT_INTERVAL)
        .build()
    {
        Ok(provider) => provider,
        Err(err) => {
            // The tracing subscriber is not installed yet; print directly.
            eprintln!("beacon: failed to create OTLP metric exporter ({err}), recording locally");
            local_meter_provider(resource)
        }
    }
}

/// Metric provider with a manual reader: metrics are recorded but not
/// exported.
fn local_meter_provider(resource: Resource) -> SdkMeterProvider {
    let reader = ManualReader::builder().build();
    SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build()
}

fn build_tracer_provider(endpoint: Option<&str>, resource: Resource) -> sdktrace::TracerProvider {
    use opentelemetry_otlp::WithExportConfig;

    let local = |resource: Resource| {
        sdktrace::TracerProvider::builder()
            .with_config(sdktrace::Config::default().with_resource(resource))
            .build()
    };

    let Some(endpoint) = endpoint else {
        return local(resource);
    };

    match opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(sdktrace::Config::default().with_resource(resource.clone()))
        .install_batch(runtime::Tokio)
    {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("beacon: failed to create OTLP span exporter ({err}), spans will not be exported");
            local(resource)
        }
    }
}

fn build_logger_provider(endpoint: Option<&str>, resource: Resource) -> LoggerProvider {
    use opentelemetry_otlp::WithExportConfig;

    let Some(endpoint) = endpoint else {
        return LoggerProvider::builder().with_resource(resource).build();
    };

    match opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint)
        .build_log_exporter()
    {
        Ok(exporter) => LoggerProvider::builder()
            .with_resource(resource)
            .with_log_processor(BatchLogProcessor::builder(exporter, runtime::Tokio).build())
            .build(),
        Err(err) => {
            eprintln!("beacon: failed to create OTLP log exporter ({err}), log records will not be exported");
            LoggerProvider::builder().with_resource(resource).build()
        }
    }
}
