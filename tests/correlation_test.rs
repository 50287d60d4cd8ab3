//! End-to-end request correlation through the front end.

mod common;

use axum::http::StatusCode;
use common::*;
use std::collections::HashSet;
use std::time::Duration;

use flight_frontend::correlation::root_id;

const WAIT: Duration = Duration::from_secs(5);

fn echoed_id(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("request-id")
        .expect("Request-Id echoed")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_new_flight_is_correlated_without_inbound_id() {
    let (collector, mut envelopes) = start_collector().await;
    let (flights, mut calls) = start_flight_service(StatusCode::CREATED).await;
    let frontend = start_frontend(config(&flights, Some(&collector))).await;

    let response = reqwest::Client::new()
        .post(frontend.url("/"))
        .form(&[
            ("vote", "startNewFlight"),
            ("departure", "KSEA"),
            ("destination", "KPDX"),
            ("callsign", "N123AB"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let request_id = echoed_id(&response);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["feedback"], "New flight started: 201");

    // The outbound call carries the first child of the request.
    let call = calls.recv().await.unwrap();
    assert_eq!(call.method, "PUT");
    assert_eq!(call.request_id.as_deref(), Some(format!("{}0.", request_id).as_str()));

    let seen = collect_until(&mut envelopes, WAIT, |seen| seen.len() >= 2).await;
    let request = seen.iter().find(|e| base_type(e) == "RequestData").expect("request record");
    let dependency = seen
        .iter()
        .find(|e| base_type(e) == "RemoteDependencyData")
        .expect("dependency record");

    assert_eq!(parent_id(request), "");
    assert_eq!(base_id(request), request_id);
    assert_eq!(operation_id(request), root_id(&request_id));
    assert_eq!(request["tags"]["ai.operation.name"], "POST /");
    assert_eq!(request["data"]["baseData"]["responseCode"], 200);

    assert_eq!(operation_id(dependency), operation_id(request));
    assert_eq!(parent_id(dependency), request_id);
    assert_eq!(Some(base_id(dependency)), call.request_id.as_deref());
    assert_eq!(dependency["data"]["baseData"]["name"], "PUT /api/flights");
    assert_eq!(dependency["data"]["baseData"]["resultCode"], 201);
    assert_eq!(dependency["data"]["baseData"]["data"], flights.as_str());

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_inbound_id_is_extended_across_process_boundary() {
    let (collector, mut envelopes) = start_collector().await;
    let (flights, _calls) = start_flight_service(StatusCode::CREATED).await;
    let frontend = start_frontend(config(&flights, Some(&collector))).await;

    let response = reqwest::Client::new()
        .get(frontend.url("/"))
        .header("Request-Id", "abc")
        .send()
        .await
        .unwrap();
    let request_id = echoed_id(&response);
    assert!(request_id.starts_with("|abc."));
    assert!(request_id.ends_with('_'));

    let seen = collect_until(&mut envelopes, WAIT, |seen| !seen.is_empty()).await;
    let request = &seen[0];
    assert_eq!(parent_id(request), "abc");
    assert_eq!(operation_id(request), "abc");
    assert_eq!(base_id(request), request_id);
    assert_eq!(request["tags"]["ai.operation.name"], "GET /");

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_concurrent_requests_get_distinct_roots() {
    const K: usize = 16;
    let (collector, mut envelopes) = start_collector().await;
    let (flights, _calls) = start_flight_service(StatusCode::CREATED).await;
    let frontend = start_frontend(config(&flights, Some(&collector))).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for _ in 0..K {
        let client = client.clone();
        let url = frontend.url("/");
        tasks.push(tokio::spawn(async move {
            let response = client.get(url).send().await.unwrap();
            echoed_id(&response)
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap());
    }
    assert_eq!(ids.len(), K);
    let roots: HashSet<_> = ids.iter().map(|id| root_id(id).to_string()).collect();
    assert_eq!(roots.len(), K);

    let seen = collect_until(&mut envelopes, WAIT, |seen| seen.len() >= K).await;
    assert_eq!(seen.len(), K);
    for envelope in &seen {
        assert!(ids.contains(base_id(envelope)));
        assert_eq!(operation_id(envelope), root_id(base_id(envelope)));
        assert_eq!(parent_id(envelope), "");
    }

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_health_checks_are_not_reported() {
    let (collector, mut envelopes) = start_collector().await;
    let (flights, _calls) = start_flight_service(StatusCode::CREATED).await;
    let frontend = start_frontend(config(&flights, Some(&collector))).await;
    let client = reqwest::Client::new();

    let health = client.get(frontend.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    assert!(health.headers().contains_key("request-id"));
    client.get(frontend.url("/")).send().await.unwrap();

    let seen = collect_until(&mut envelopes, WAIT, |seen| {
        seen.iter().any(|e| e["data"]["baseData"]["name"] == "GET /")
    })
    .await;
    assert!(seen.iter().all(|e| e["data"]["baseData"]["name"] != "GET /health"));

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_rejected_flight_reports_failure() {
    let (collector, mut envelopes) = start_collector().await;
    let (flights, _calls) = start_flight_service(StatusCode::CONFLICT).await;
    let frontend = start_frontend(config(&flights, Some(&collector))).await;

    let body: serde_json::Value = reqwest::Client::new()
        .post(frontend.url("/"))
        .form(&[
            ("vote", "startNewFlight"),
            ("departure", "KSEA"),
            ("destination", "KPDX"),
            ("callsign", "N123AB"),
        ])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["feedback"], "Failed to start flight, 409, Conflict");

    let seen = collect_until(&mut envelopes, WAIT, |seen| {
        seen.iter().any(|e| base_type(e) == "RemoteDependencyData")
    })
    .await;
    let dependency = seen
        .iter()
        .find(|e| base_type(e) == "RemoteDependencyData")
        .expect("dependency record");
    assert_eq!(dependency["data"]["baseData"]["success"], false);
    assert_eq!(dependency["data"]["baseData"]["resultCode"], 409);

    let _ = frontend.shutdown.send(());
}

#[tokio::test]
async fn test_incomplete_form_makes_no_call() {
    let (flights, mut calls) = start_flight_service(StatusCode::CREATED).await;
    let frontend = start_frontend(config(&flights, None)).await;

    let body: serde_json::Value = reqwest::Client::new()
        .post(frontend.url("/"))
        .form(&[("vote", "startNewFlight"), ("departure", "KSEA")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["feedback"], "Input can't be null!");
    assert!(calls.try_recv().is_err());

    let _ = frontend.shutdown.send(());
}
