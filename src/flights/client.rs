//! Flight service HTTP client.
//!
//! # Responsibilities
//! - Start flights (`PUT`) and stream flight status (`GET`)
//! - Derive a child trace context for every call and send it as `Request-Id`
//! - Report each call as dependency telemetry
//!
//! Failures surface to the caller as `FlightError`. Calls that never got a
//! response produce no dependency record.

use axum::http::HeaderMap;
use chrono::Utc;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::broadcast;
use url::Url;

use crate::config::FlightServiceConfig;
use crate::correlation::{inject_request_id, TraceContext};
use crate::flights::error::{FlightError, FlightResult};
use crate::flights::monitor::MonitorRun;
use crate::flights::types::{FlightEvent, FlightPlan};
use crate::observability::metrics;
use crate::telemetry::{
    build_dependency_telemetry, build_stream_dependency_telemetry, TelemetryDispatcher,
};

/// How a status stream ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The monitoring run was turned off.
    Cancelled,
    /// The flight service closed the stream.
    Closed,
}

/// Client for the upstream flight service.
#[derive(Clone)]
pub struct FlightServiceClient {
    http: reqwest::Client,
    stream_http: reqwest::Client,
    endpoint: Url,
    dispatcher: TelemetryDispatcher,
}

impl FlightServiceClient {
    pub fn new(config: &FlightServiceConfig, dispatcher: TelemetryDispatcher) -> FlightResult<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|_| FlightError::InvalidEndpoint(config.endpoint.clone()))?;
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);

        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        // Status streams run until cancelled, so only the connect phase is bounded.
        let stream_http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            http,
            stream_http,
            endpoint,
            dispatcher,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask the flight service to start `plan`. Returns the success status.
    pub async fn start_flight(&self, ctx: &mut TraceContext, plan: &FlightPlan) -> FlightResult<u16> {
        let call = ctx.child();
        let mut headers = HeaderMap::new();
        inject_request_id(&mut headers, call.activity());

        tracing::debug!(
            request_id = %call.activity(),
            call_sign = %plan.call_sign,
            "Starting flight"
        );

        let response = match self
            .http
            .put(self.endpoint.clone())
            .headers(headers)
            .json(plan)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(request_id = %call.activity(), error = %e, "Flight service unreachable");
                return Err(FlightError::Unreachable(e));
            }
        };

        let status = response.status();
        self.dispatcher.send(build_dependency_telemetry(
            &call,
            "PUT",
            self.endpoint.as_str(),
            &path_portion(&self.endpoint),
            status.as_u16(),
            call.started(),
            Utc::now(),
        ));
        metrics::record_dependency("PUT", status.as_u16());

        if status.as_u16() < 300 {
            Ok(status.as_u16())
        } else {
            Err(FlightError::Rejected {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            })
        }
    }

    /// Stream flight status lines into `events` until `run` is cancelled or
    /// the service closes the stream. Cancellation also interrupts a request
    /// still waiting for response headers.
    ///
    /// The dependency record is sent before the request goes out, since the
    /// end of the stream is never reported.
    pub async fn stream_flights(
        &self,
        ctx: &mut TraceContext,
        run: &MonitorRun,
        events: &broadcast::Sender<FlightEvent>,
    ) -> FlightResult<StreamEnd> {
        let call = ctx.child();
        let mut headers = HeaderMap::new();
        inject_request_id(&mut headers, call.activity());

        self.dispatcher.send(build_stream_dependency_telemetry(
            &call,
            "GET",
            self.endpoint.as_str(),
            &path_portion(&self.endpoint),
        ));

        let request = self.stream_http.get(self.endpoint.clone()).headers(headers).send();
        let response = tokio::select! {
            response = request => response?,
            _ = run.cancelled() => return Ok(StreamEnd::Cancelled),
        };

        let status = response.status();
        metrics::record_dependency("GET", status.as_u16());
        if !status.is_success() {
            return Err(FlightError::Rejected {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        tracing::info!(request_id = %call.activity(), "Flight status stream open");

        let mut body = response.bytes_stream();
        let mut lines = LineBuffer::default();
        loop {
            if !run.is_live() {
                return Ok(StreamEnd::Cancelled);
            }

            let chunk = tokio::select! {
                chunk = body.next() => chunk,
                _ = run.cancelled() => return Ok(StreamEnd::Cancelled),
            };

            let batch = match chunk {
                Some(chunk) => lines.push(&chunk?),
                None => {
                    if let Some(rest) = lines.finish() {
                        let _ = events.send(FlightEvent::now(rest));
                    }
                    return Ok(StreamEnd::Closed);
                }
            };

            for line in batch {
                if !run.is_live() {
                    return Ok(StreamEnd::Cancelled);
                }
                // No subscribers is fine; the UI may not be connected.
                let _ = events.send(FlightEvent::now(line));
            }
        }
    }
}

/// Path and query of `url`, as sent on the request line.
pub fn path_portion(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Splits a byte stream into non-empty text lines.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(line) = decode_line(&raw) {
                lines.push(line);
            }
        }
        lines
    }

    fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.pending);
        decode_line(&raw)
    }
}

/// Blank lines are keep-alives and are skipped.
fn decode_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim_end_matches(&['\r', '\n'][..]);
    if line.trim().is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
