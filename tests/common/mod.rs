//! Shared utilities for integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use flight_frontend::flights::FlightMonitor;
use flight_frontend::{FrontendConfig, HttpServer, TelemetryDispatcher};

/// A call seen by the mock flight service.
#[derive(Debug, Clone)]
pub struct FlightCall {
    pub method: &'static str,
    pub request_id: Option<String>,
}

/// Running front end under test.
pub struct Frontend {
    pub addr: SocketAddr,
    pub monitor: Arc<FlightMonitor>,
    pub shutdown: broadcast::Sender<()>,
}

impl Frontend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Start a collector that forwards every envelope it receives.
pub async fn start_collector() -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().route(
        "/ApplicationInsightsHttpChannel",
        post(move |Json(envelope): Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(envelope);
                StatusCode::OK
            }
        }),
    );
    let addr = serve(router).await;
    (format!("http://{}/ApplicationInsightsHttpChannel", addr), rx)
}

/// Start a flight service. `PUT` answers `put_status`; `GET` streams one
/// status line every 20ms until the client hangs up.
pub async fn start_flight_service(
    put_status: StatusCode,
) -> (String, mpsc::UnboundedReceiver<FlightCall>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let put_tx = tx.clone();
    let router = Router::new().route(
        "/api/flights",
        put(move |headers: HeaderMap| {
            let tx = put_tx.clone();
            async move {
                let _ = tx.send(FlightCall {
                    method: "PUT",
                    request_id: request_id(&headers),
                });
                put_status
            }
        })
        .get(move |headers: HeaderMap| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(FlightCall {
                    method: "GET",
                    request_id: request_id(&headers),
                });
                let lines = futures_util::stream::unfold(0u32, |n| async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    let line = format!("{{\"callSign\":\"N{}\",\"state\":\"enroute\"}}\n\n", n);
                    Some((Ok::<_, std::convert::Infallible>(line), n + 1))
                });
                Body::from_stream(lines)
            }
        }),
    );
    let addr = serve(router).await;
    (format!("http://{}/api/flights", addr), rx)
}

/// Start a flight service whose `GET` is recorded but never answered.
pub async fn start_unresponsive_flight_service() -> (String, mpsc::UnboundedReceiver<FlightCall>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().route(
        "/api/flights",
        get(move |headers: HeaderMap| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(FlightCall {
                    method: "GET",
                    request_id: request_id(&headers),
                });
                std::future::pending::<StatusCode>().await
            }
        }),
    );
    let addr = serve(router).await;
    (format!("http://{}/api/flights", addr), rx)
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Config pointing at the given collaborators.
pub fn config(flight_service: &str, collector: Option<&str>) -> FrontendConfig {
    let mut config = FrontendConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.flight_service.endpoint = flight_service.to_string();
    config.flight_service.connect_timeout_secs = 1;
    config.flight_service.request_timeout_secs = 5;
    config.telemetry.collector_endpoint = collector.map(str::to_string);
    config.telemetry.request_timeout_secs = 1;
    config
}

/// Start the front end on an ephemeral port.
pub async fn start_frontend(config: FrontendConfig) -> Frontend {
    let (dispatcher, _worker) = TelemetryDispatcher::start(&config.telemetry).unwrap();
    let server = HttpServer::new(&config, dispatcher).unwrap();
    let monitor = server.monitor();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        server.run(listener, shutdown_rx).await.unwrap();
    });

    Frontend {
        addr,
        monitor,
        shutdown,
    }
}

/// Receive envelopes until `done` is satisfied or `timeout` passes.
pub async fn collect_until<F>(
    rx: &mut mpsc::UnboundedReceiver<Value>,
    timeout: Duration,
    mut done: F,
) -> Vec<Value>
where
    F: FnMut(&[Value]) -> bool,
{
    let mut seen = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        while let Some(envelope) = rx.recv().await {
            seen.push(envelope);
            if done(&seen) {
                break;
            }
        }
    })
    .await;
    seen
}

pub fn base_type(envelope: &Value) -> &str {
    envelope["data"]["baseType"].as_str().unwrap_or_default()
}

pub fn operation_id(envelope: &Value) -> &str {
    envelope["tags"]["ai.operation.id"].as_str().unwrap_or_default()
}

pub fn parent_id(envelope: &Value) -> &str {
    envelope["tags"]["ai.operation.parentId"].as_str().unwrap_or_default()
}

pub fn base_id(envelope: &Value) -> &str {
    envelope["data"]["baseData"]["id"].as_str().unwrap_or_default()
}
