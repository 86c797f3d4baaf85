//! HTTP endpoint tests using axum-test, with a local stand-in for the
//! summarization endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use pdfsum_core::pdf::fixtures::sample_pdf;
use pdfsum_core::validate::encode_pdf_payload;
use pdfsum_core::{ApiKey, PdfsumConfig};

use crate::{AppState, router};

/// Requests seen by the fake upstream: (authorization header, body).
type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

struct Upstream {
    endpoint: String,
    seen: Seen,
}

impl Upstream {
    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last_text(&self) -> String {
        let seen = self.seen.lock().unwrap();
        seen.last().unwrap().1["text"].as_str().unwrap().to_string()
    }
}

async fn spawn_upstream(status: StatusCode, answer: Value) -> Upstream {
    let seen: Seen = Arc::default();
    let recorder = Arc::clone(&seen);
    let app = Router::new().route(
        "/v1/summarize",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = Arc::clone(&recorder);
            let answer = answer.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                recorder.lock().unwrap().push((auth, body));
                (status, Json(answer))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        endpoint: format!("http://{}/v1/summarize", addr),
        seen,
    }
}

fn create_test_server(upstream: &Upstream, configure: impl FnOnce(&mut PdfsumConfig)) -> TestServer {
    let mut config = PdfsumConfig::default();
    config.summarizer.endpoint = upstream.endpoint.clone();
    configure(&mut config);

    let state = AppState::new(&config, ApiKey::new("server-side-key")).unwrap();
    TestServer::new(router(state, config.server.body_limit_bytes)).unwrap()
}

async fn ok_upstream() -> Upstream {
    spawn_upstream(StatusCode::OK, json!({ "summary": "A concise summary." })).await
}

#[tokio::test]
async fn test_health_returns_200() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server.get("/health").await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "pdfsum-server");
}

#[tokio::test]
async fn test_summarize_returns_summary() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let pdf = sample_pdf(&["Board meeting minutes", "Budget approved"]);
    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(&pdf), "fileName": "minutes.pdf" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "summary": "A concise summary." }));

    assert_eq!(upstream.calls(), 1);
    let seen = upstream.seen.lock().unwrap();
    assert_eq!(seen[0].0.as_deref(), Some("Bearer server-side-key"));
    assert_eq!(seen[0].1["max_length"], 200);
    let text = seen[0].1["text"].as_str().unwrap();
    assert!(text.find("Board meeting minutes").unwrap() < text.find("Budget approved").unwrap());
}

#[tokio::test]
async fn test_missing_pdf_data_is_400_without_upstream_call() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server.post("/api/summarize").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "No PDF data provided" })
    );
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_empty_pdf_data_is_400() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No PDF data provided");
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_invalid_base64_is_400() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": "%%% not base64 %%%" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("base64"));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_non_pdf_bytes_are_400() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(b"just some text") }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_client_error_with_error_field() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server.post("/api/summarize").text("{ not json").await;

    assert!(response.status_code().is_client_error());
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_wrong_typed_field_is_400() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": 123 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_invalid_json_syntax_is_400() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server
        .post("/api/summarize")
        .bytes(Bytes::from_static(b"{ \"pdfData\": "))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_corrupt_pdf_is_422() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(b"%PDF-1.7\n% truncated") }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["error"].as_str().unwrap().starts_with("PDF error"));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_upstream_failure_is_502() {
    let upstream = spawn_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "model overloaded" }),
    )
    .await;
    let server = create_test_server(&upstream, |_| {});

    let pdf = sample_pdf(&["anything"]);
    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(&pdf) }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("API request failed"));
    // No retry.
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_unexpected_upstream_schema_is_502() {
    let upstream = spawn_upstream(StatusCode::OK, json!({ "result": "elsewhere" })).await;
    let server = create_test_server(&upstream, |_| {});

    let pdf = sample_pdf(&["anything"]);
    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(&pdf) }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_configured_summary_field() {
    let upstream = spawn_upstream(StatusCode::OK, json!({ "result": "from result" })).await;
    let server = create_test_server(&upstream, |config| {
        config.summarizer.summary_field = "result".to_string();
    });

    let pdf = sample_pdf(&["anything"]);
    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(&pdf) }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["summary"], "from result");
}

#[tokio::test]
async fn test_exactly_budget_chars_sent_upstream() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |config| {
        config.summarizer.truncate_chars = 25;
    });

    let line = "0123456789".repeat(10);
    let pdf = sample_pdf(&[line.as_str(), line.as_str()]);
    let response = server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(&pdf) }))
        .await;

    response.assert_status_ok();
    assert_eq!(upstream.last_text(), &line[..25]);
}

#[tokio::test]
async fn test_server_processes_all_pages_by_default() {
    let upstream = ok_upstream().await;
    let server = create_test_server(&upstream, |_| {});

    let pages = ["one", "two", "three", "four", "five", "six", "seven"];
    let pdf = sample_pdf(&pages);
    server
        .post("/api/summarize")
        .json(&json!({ "pdfData": encode_pdf_payload(&pdf) }))
        .await
        .assert_status_ok();

    assert!(upstream.last_text().contains("seven"));
}
