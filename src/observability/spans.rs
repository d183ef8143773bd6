//! Per-request span emission.
//!
//! Every route passes through [`track_request`] unconditionally, error
//! paths included: the span opens before route-specific logic runs and
//! ends only after the response exists, so a request can neither skip its
//! span nor end it twice.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::trace::{Span, SpanKind, Status, Tracer};
use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::server::AppState;

/// Middleware wrapping each request in a span.
///
/// Attributes set on entry: request method, path, a generated request id,
/// and the caller's user agent when present. The response status code is
/// recorded before the span ends; 4xx/5xx responses mark the span status
/// as error.
pub async fn track_request(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_owned();
    let path = request.uri().path().to_owned();
    let request_id = Uuid::new_v4().to_string();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let tracer = state.telemetry.tracer();
    let mut attributes = vec![
        KeyValue::new("http.request.method", method.clone()),
        KeyValue::new("url.path", path.clone()),
        KeyValue::new("request.id", request_id),
    ];
    if let Some(user_agent) = user_agent {
        attributes.push(KeyValue::new("user_agent.original", user_agent));
    }

    let mut span = tracer
        .span_builder(format!("{method} {path}"))
        .with_kind(SpanKind::Server)
        .with_attributes(attributes)
        .start(tracer);

    let response = next.run(request).await;

    let status = response.status();
    span.set_attribute(KeyValue::new(
        "http.response.status_code",
        i64::from(status.as_u16()),
    ));
    if status.is_client_error() || status.is_server_error() {
        let reason = status.canonical_reason().unwrap_or("request failed");
        span.set_status(Status::error(reason.to_owned()));
    }
    span.end();

    response
}
