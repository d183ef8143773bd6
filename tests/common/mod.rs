//! Test utilities and server harness for Beacon tests.
//!
//! Provides:
//! - In-process test server setup on an ephemeral port
//! - In-memory exporters for metrics, spans, and log records
//! - Snapshot helpers for exported instrument values

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use opentelemetry::KeyValue;
use opentelemetry_sdk::logs::LoggerProvider;
use opentelemetry_sdk::metrics::data::{Histogram as HistogramData, ResourceMetrics, Sum};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::testing::logs::InMemoryLogsExporter;
use opentelemetry_sdk::testing::metrics::InMemoryMetricsExporter;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace as sdktrace;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use beacon::config::Config;

use beacon::observability::tracing::init_test_tracing;
use beacon::observability::Telemetry;
use beacon::server::{build_router, AppState};

/// A deterministic configuration for tests: no induced failures, short
/// delays, and an unreachable upstream unless a test overrides it.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        service_name: Some("beacon-test".into()),
        otel_endpoint: None,
        log_level: "error".into(),
        failure_rate: 0.0,
        jitter_ms: 5,
        delay_ms: 100,
        upstream_url: "http://127.0.0.1:1/unreachable".into(),
    }
}

/// In-process Beacon server wired to in-memory exporters.
pub struct TestServer {
    pub addr: SocketAddr,
    pub metrics: InMemoryMetricsExporter,
    pub spans: InMemorySpanExporter,
    pub logs: InMemoryLogsExporter,
    meter_provider: SdkMeterProvider,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the given configuration.
    pub async fn start(config: Config) -> Self {
        init_test_tracing();

        let metrics_exporter = InMemoryMetricsExporter::default();
        let meter_provider = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(metrics_exporter.clone(), runtime::Tokio).build())
            .build();

        let span_exporter = InMemorySpanExporter::default();
        let tracer_provider = sdktrace::TracerProvider::builder()
            .with_simple_exporter(span_exporter.clone())
            .build();

        let logs_exporter = InMemoryLogsExporter::default();
        let logger_provider = LoggerProvider::builder()
            .with_simple_exporter(logs_exporter.clone())
            .build();

        let telemetry = Arc::new(Telemetry::from_providers(
            meter_provider.clone(),
            tracer_provider,
            logger_provider,
        ));

        let state = AppState {
            telemetry,
            http: reqwest::Client::new(),
            config: Arc::new(config),
        };
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .expect("test server failed");
        });

        Self {
            addr,
            metrics: metrics_exporter,
            spans: span_exporter,
            logs: logs_exporter,
            meter_provider,
            shutdown_tx,
            handle,
        }
    }

    /// Start a server with the default test configuration.
    pub async fn start_default() -> Self {
        Self::start(test_config()).await
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A client for driving requests against this server.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    /// Flush the periodic reader and return all exported metric batches.
    pub fn collected_metrics(&self) -> Vec<ResourceMetrics> {
        self.meter_provider.force_flush().expect("failed to flush metrics");
        self.metrics
            .get_finished_metrics()
            .expect("failed to snapshot metrics")
    }

    /// Latest exported value of a sum-aggregated `i64` instrument
    /// (up-down counter), summed across attribute sets.
    pub fn sum_i64(&self, name: &str) -> Option<i64> {
        let batches = self.collected_metrics();
        let metrics = find_metric_data::<Sum<i64>>(batches.last()?, name)?;
        Some(metrics.data_points.iter().map(|point| point.value).sum())
    }

    /// Latest exported value of a sum-aggregated `u64` instrument
    /// (counter), summed across attribute sets.
    pub fn sum_u64(&self, name: &str) -> Option<u64> {
        let batches = self.collected_metrics();
        let metrics = find_metric_data::<Sum<u64>>(batches.last()?, name)?;
        Some(metrics.data_points.iter().map(|point| point.value).sum())
    }

    /// Latest exported histogram data points as `(count, attributes)`
    /// pairs.
    pub fn histogram_points(&self, name: &str) -> Vec<(u64, Vec<KeyValue>)> {
        let batches = self.collected_metrics();
        let Some(batch) = batches.last() else {
            return Vec::new();
        };
        match find_metric_data::<HistogramData<f64>>(batch, name) {
            Some(histogram) => histogram
                .data_points
                .iter()
                .map(|point| (point.count, point.attributes.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Stop the server and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

/// Find a named metric in a batch and downcast its aggregation.
fn find_metric_data<'a, T: 'static>(batch: &'a ResourceMetrics, name: &str) -> Option<&'a T> {
    batch
        .scope_metrics
        .iter()
        .flat_map(|scope| scope.metrics.iter())
        .find(|metric| metric.name == name)
        .and_then(|metric| metric.data.as_any().downcast_ref::<T>())
}

/// Attribute-set helper: true when `attributes` carries the given
/// key/value pair.
pub fn has_attribute(attributes: &[KeyValue], expected: &KeyValue) -> bool {
    attributes.iter().any(|attribute| attribute == expected)
}

/// Spawn a mock upstream server answering `GET /todos/1` with a fixed JSON
/// document, for fetch-route tests.
pub async fn spawn_upstream() -> (SocketAddr, JoinHandle<()>) {
    let app = axum::Router::new().route(
        "/todos/1",
        axum::routing::get(|| async {
            axum::Json(serde_json::json!({
                "userId": 1,
                "id": 1,
                "title": "delectus aut autem",
                "completed": false
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind upstream listener");
    let addr = listener.local_addr().expect("upstream has no local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream failed");
    });

    (addr, handle)
}
