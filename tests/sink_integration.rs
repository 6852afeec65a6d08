//! Integration tests for the Loki sink against a local fake endpoint.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use logship::config::SinkConfig;
use logship::record::LogRecord;
use logship::sink::{LokiPayload, LokiSink, Sink, SinkError};

/// Captured pushes plus the statuses to answer with, in order.
#[derive(Clone, Default)]
struct FakeLoki {
    received: Arc<Mutex<Vec<LokiPayload>>>,
    responses: Arc<Mutex<VecDeque<StatusCode>>>,
}

async fn push(State(loki): State<FakeLoki>, Json(payload): Json<LokiPayload>) -> StatusCode {
    loki.received.lock().unwrap().push(payload);
    loki.responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(StatusCode::NO_CONTENT)
}

/// Start the fake endpoint and return its push URL.
async fn spawn_fake_loki(loki: FakeLoki) -> String {
    let router = Router::new()
        .route("/loki/api/v1/push", post(push))
        .with_state(loki);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}/loki/api/v1/push")
}

fn sink_for(url: String, max_retries: u32) -> LokiSink {
    let config = SinkConfig {
        url,
        connect_timeout_secs: 2,
        timeout_secs: 5,
        max_retries,
    };
    LokiSink::from_config(&config).unwrap()
}

fn record(message: &str) -> LogRecord {
    LogRecord::new(
        Path::new("/logs/pdv/log.txt"),
        message.to_string(),
        "pdv".to_string(),
    )
}

#[tokio::test]
async fn test_push_delivers_payload() {
    let loki = FakeLoki::default();
    let url = spawn_fake_loki(loki.clone()).await;
    let sink = sink_for(url, 0);

    sink.send(&record("erro ao imprimir cupom")).await.unwrap();

    let received = loki.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let stream = &received[0].streams[0];
    assert_eq!(stream.stream["app"], "pdv");
    assert_eq!(stream.stream["level"], "error");
    assert_eq!(stream.stream["file"], "/logs/pdv/log.txt");

    let line: serde_json::Value = serde_json::from_str(&stream.values[0][1]).unwrap();
    assert_eq!(line["message"], "erro ao imprimir cupom");
}

#[tokio::test]
async fn test_client_error_is_rejected_without_retry() {
    let loki = FakeLoki::default();
    loki.responses
        .lock()
        .unwrap()
        .push_back(StatusCode::BAD_REQUEST);
    let url = spawn_fake_loki(loki.clone()).await;
    let sink = sink_for(url, 3);

    let err = sink.send(&record("processo concluído")).await.unwrap_err();
    assert!(matches!(err, SinkError::Rejected { status: 400, .. }));
    assert_eq!(loki.received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let loki = FakeLoki::default();
    loki.responses
        .lock()
        .unwrap()
        .push_back(StatusCode::SERVICE_UNAVAILABLE);
    let url = spawn_fake_loki(loki.clone()).await;
    let sink = sink_for(url, 1);

    sink.send(&record("aviso: fila cheia")).await.unwrap();
    assert_eq!(loki.received.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_server_error_without_retries_fails() {
    let loki = FakeLoki::default();
    loki.responses
        .lock()
        .unwrap()
        .push_back(StatusCode::INTERNAL_SERVER_ERROR);
    let url = spawn_fake_loki(loki.clone()).await;
    let sink = sink_for(url, 0);

    let err = sink.send(&record("aviso")).await.unwrap_err();
    assert!(matches!(err, SinkError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_an_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = LokiSink::new(
        format!("http://{addr}/loki/api/v1/push").parse().unwrap(),
        Duration::from_millis(500),
        Duration::from_millis(500),
    )
    .unwrap();

    let err = sink.send(&record("erro")).await.unwrap_err();
    assert!(matches!(
        err,
        SinkError::Request(_) | SinkError::Timeout
    ));
}

#[test]
fn test_invalid_url_is_rejected() {
    let config = SinkConfig {
        url: "::not a url::".to_string(),
        ..Default::default()
    };
    let err = LokiSink::from_config(&config).unwrap_err();
    assert!(matches!(err, SinkError::InvalidUrl(_)));
}
