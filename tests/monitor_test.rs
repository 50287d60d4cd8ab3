//! Flight monitoring runs in the background with its own trace context.

mod common;

use axum::http::StatusCode;
use common::*;
use std::time::Duration;
use tokio::sync::broadcast;

use flight_frontend::flights::FlightEvent;
use flight_frontend::TraceContext;

const WAIT: Duration = Duration::from_secs(5);

async fn toggle(frontend: &Frontend, request_id: Option<&str>) -> serde_json::Value {
    let mut request = reqwest::Client::new()
        .post(frontend.url("/"))
        .form(&[("vote", "showFlights")]);
    if let Some(id) = request_id {
        request = request.header("Request-Id", id);
    }
    request.send().await.unwrap().json().await.unwrap()
}

async fn next_event(events: &mut broadcast::Receiver<FlightEvent>) -> FlightEvent {
    tokio::time::timeout(WAIT, events.recv())
        .await
        .expect("event before timeout")
        .expect("event channel open")
}

async fn wait_for_message(events: &mut broadcast::Receiver<FlightEvent>, needle: &str) -> FlightEvent {
    loop {
        let event = next_event(events).await;
        if event.message.contains(needle) {
            return event;
        }
    }
}

/// Sequence number of a mock status line, e.g. `7` for `"callSign":"N7"`.
fn line_number(event: &FlightEvent) -> Option<u32> {
    let rest = event.message.split("\"callSign\":\"N").nth(1)?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

const STOPPED: &str = "Monitoring is stopped on request";

#[tokio::test]
async fn test_monitoring_streams_then_stops_on_request() {
    let (collector, mut envelopes) = start_collector().await;
    let (flights, mut calls) = start_flight_service(StatusCode::OK).await;
    let frontend = start_frontend(config(&flights, Some(&collector))).await;
    let mut events = frontend.monitor.subscribe();

    let body = toggle(&frontend, Some("|ops-console.4.")).await;
    assert_eq!(body["feedback"], "Flights monitoring started");
    assert_eq!(body["monitoring"], true);

    // The background task used a child of the request's first child.
    let call = calls.recv().await.unwrap();
    assert_eq!(call.method, "GET");
    let stream_id = call.request_id.unwrap();
    assert!(stream_id.starts_with("|ops-console.4."));
    assert!(stream_id.ends_with("_0.0."));

    let first = next_event(&mut events).await;
    assert!(first.message.contains("\"callSign\":\"N0\""));
    let second = next_event(&mut events).await;
    assert!(second.message.contains("\"callSign\":\"N1\""));

    let body = toggle(&frontend, None).await;
    assert_eq!(body["feedback"], "Flights monitoring stopped");
    assert_eq!(body["monitoring"], false);
    wait_for_message(&mut events, STOPPED).await;

    let seen = collect_until(&mut envelopes, WAIT, |seen| {
        seen.iter().any(|e| base_type(e) == "RemoteDependencyData")
    })
    .await;
    let stream = seen
        .iter()
        .find(|e| base_type(e) == "RemoteDependencyData")
        .expect("stream dependency record");
    assert_eq!(base_id(stream), stream_id);
    assert_eq!(operation_id(stream), "ops-console");
    assert_eq!(stream["data"]["baseData"]["duration"], "00:00:00");
    assert_eq!(stream["data"]["baseData"]["resultCode"], 200);
    assert_eq!(stream["data"]["baseData"]["name"], "GET /api/flights");

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_monitoring_failure_clears_state() {
    let frontend = start_frontend(config("http://127.0.0.1:1/api/flights", None)).await;
    let mut events = frontend.monitor.subscribe();

    let body = toggle(&frontend, None).await;
    assert_eq!(body["feedback"], "Flights monitoring started");

    wait_for_message(&mut events, "Stopping monitoring flights").await;
    assert!(!frontend.monitor.is_monitoring());

    let body: serde_json::Value = reqwest::get(frontend.url("/")).await.unwrap().json().await.unwrap();
    assert_eq!(body["monitoring"], false);

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_shutdown_stops_monitoring() {
    let (flights, _calls) = start_flight_service(StatusCode::OK).await;
    let frontend = start_frontend(config(&flights, None)).await;
    let mut events = frontend.monitor.subscribe();

    toggle(&frontend, None).await;
    next_event(&mut events).await;

    frontend.shutdown.send(()).unwrap();
    wait_for_message(&mut events, STOPPED).await;
    assert!(!frontend.monitor.is_monitoring());
}

#[tokio::test]
async fn test_restart_right_after_stop_replaces_the_old_stream() {
    let (flights, mut calls) = start_flight_service(StatusCode::OK).await;
    let frontend = start_frontend(config(&flights, None)).await;
    let mut events = frontend.monitor.subscribe();
    let mut ctx = TraceContext::from_request_id(None, "POST /");

    let first_run = frontend.monitor.start(&mut ctx).expect("first start");
    next_event(&mut events).await;

    // Restart before the first task gets a chance to observe the stop.
    assert!(frontend.monitor.stop());
    let second_run = frontend.monitor.start(&mut ctx).expect("restart");

    tokio::time::timeout(WAIT, first_run)
        .await
        .expect("old task should end after stop")
        .unwrap();

    // Lines from the old stream can only precede its stop notice; after it,
    // only the new stream is heard.
    wait_for_message(&mut events, STOPPED).await;
    let mut numbers = Vec::new();
    while numbers.len() < 4 {
        let event = next_event(&mut events).await;
        assert!(!event.message.contains(STOPPED), "stop reported twice");
        if let Some(n) = line_number(&event) {
            numbers.push(n);
        }
    }
    assert!(
        numbers.windows(2).all(|w| w[0] < w[1]),
        "interleaved streams: {:?}",
        numbers
    );
    assert!(frontend.monitor.is_monitoring());

    let gets: Vec<_> = std::iter::from_fn(|| calls.try_recv().ok())
        .filter(|c| c.method == "GET")
        .collect();
    assert_eq!(gets.len(), 2);
    assert_ne!(gets[0].request_id, gets[1].request_id);

    assert!(frontend.monitor.stop());
    tokio::time::timeout(WAIT, second_run)
        .await
        .expect("new task should end after stop")
        .unwrap();
    assert!(!frontend.monitor.is_monitoring());

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_stop_interrupts_request_waiting_for_headers() {
    let (flights, mut calls) = start_unresponsive_flight_service().await;
    let frontend = start_frontend(config(&flights, None)).await;
    let mut events = frontend.monitor.subscribe();
    let mut ctx = TraceContext::from_request_id(None, "POST /");

    let run = frontend.monitor.start(&mut ctx).expect("start");
    let call = tokio::time::timeout(WAIT, calls.recv())
        .await
        .expect("GET before timeout")
        .unwrap();
    assert_eq!(call.method, "GET");

    assert!(frontend.monitor.stop());
    tokio::time::timeout(WAIT, run)
        .await
        .expect("task should end while the service is silent")
        .unwrap();
    wait_for_message(&mut events, STOPPED).await;
    assert!(!frontend.monitor.is_monitoring());

    let _ = frontend.shutdown.send(());
}
