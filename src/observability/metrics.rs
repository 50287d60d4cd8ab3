//! Metrics collection and exposition.
//!
//! # Metrics
//! - `frontend_requests_total` (counter): inbound requests by method, status
//! - `frontend_request_duration_seconds` (histogram): inbound latency
//! - `frontend_dependency_calls_total` (counter): outbound calls by method, status
//! - `frontend_telemetry_envelopes_total` (counter): telemetry records by outcome
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_metrics();
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

fn describe_metrics() {
    describe_counter!("frontend_requests_total", "Inbound HTTP requests");
    describe_histogram!(
        "frontend_request_duration_seconds",
        "Inbound HTTP request latency"
    );
    describe_counter!("frontend_dependency_calls_total", "Outbound HTTP calls");
    describe_counter!(
        "frontend_telemetry_envelopes_total",
        "Telemetry records by delivery outcome"
    );
}

pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    counter!(
        "frontend_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("frontend_request_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_dependency(method: &str, status: u16) {
    counter!(
        "frontend_dependency_calls_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_telemetry(outcome: &'static str) {
    counter!("frontend_telemetry_envelopes_total", "outcome" => outcome).increment(1);
}
