//! Inbound correlation layer.
//!
//! Runs around every route: starts or extends the caller's trace, hands the
//! handler its own `TraceContext`, and reports the finished request.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::time::Instant;

use crate::correlation::{extract_request_id, inject_request_id, TraceContext};
use crate::observability::metrics;
use crate::telemetry::{build_request_telemetry, TelemetryDispatcher};

/// Attach a [`TraceContext`] to the request and emit request telemetry once
/// the response is ready.
///
/// The handler receives the context through `Extension<TraceContext>`. The
/// response echoes the request's activity id in `Request-Id`.
pub async fn correlation_middleware(
    State(dispatcher): State<TelemetryDispatcher>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().as_str().to_string();
    let route = route_name(&request);
    let url = request_url(&request);

    let ctx = TraceContext::from_request_id(
        extract_request_id(request.headers()),
        format!("{} {}", method, route),
    );

    tracing::debug!(
        request_id = %ctx.activity(),
        parent_id = %ctx.activity().parent_id(),
        method = %method,
        route = %route,
        "Request started"
    );

    request.extensions_mut().insert(ctx.clone());
    let mut response = next.run(request).await;

    inject_request_id(response.headers_mut(), ctx.activity());

    let status = response.status().as_u16();
    dispatcher.send(build_request_telemetry(
        &ctx,
        &method,
        &route,
        status,
        ctx.started(),
        Utc::now(),
        &url,
    ));
    metrics::record_request(&method, status, start_time.elapsed());

    response
}

/// Route template the request matched, or its raw path.
fn route_name(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Absolute URL of the request, without the query string.
fn request_url(request: &Request<Body>) -> String {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    let scheme = request.uri().scheme_str().unwrap_or("http");
    format!("{}://{}{}", scheme, host, request.uri().path())
}
