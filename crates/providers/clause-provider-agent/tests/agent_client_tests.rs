//! End-to-end tests of the agent client against an in-process HTTP agent

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clause_core::{
    AgentApi, BodyPreview, ChatConfig, ChatController, ConnectionState, ExchangeOutcome,
    NormalizedResult, ProbeOutcome, TransportError, UNREADABLE_BODY,
};
use clause_provider_agent::{AgentClient, CHAT_PATH, DIAGNOSTIC_TEST_MESSAGE};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const API_KEY: &str = "test-key";

async fn spawn_agent(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(endpoint: &str) -> AgentClient {
    AgentClient::new(ChatConfig::new(endpoint, API_KEY).unwrap())
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", API_KEY))
        .unwrap_or(false)
}

async fn echo_completion(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "bad token"}))).into_response();
    }
    let content = body["messages"][0]["content"].as_str().unwrap_or_default();
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": format!("echo: {}", content)}}],
        "stream": body["stream"],
        "guardrails": {"triggered_guardrails": []}
    }))
    .into_response()
}

fn unused_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn test_send_normalizes_completion() {
    let endpoint = spawn_agent(Router::new().route(CHAT_PATH, post(echo_completion))).await;
    let client = client_for(&endpoint);

    let result = client.send("What does clause 4 say?").await.unwrap();
    assert_eq!(
        result,
        NormalizedResult::Success("echo: What does clause 4 say?".to_string())
    );
}

#[tokio::test]
async fn test_request_envelope_reaches_agent() {
    async fn inspect(Json(body): Json<Value>) -> Json<Value> {
        let ok = body["stream"] == json!(false)
            && body["include_functions_info"] == json!(true)
            && body["include_retrieval_info"] == json!(true)
            && body["include_guardrails_info"] == json!(true)
            && body["messages"][0]["role"] == json!("user");
        let verdict = if ok { "envelope ok" } else { "envelope wrong" };
        Json(json!({"message": verdict}))
    }

    let endpoint = spawn_agent(Router::new().route(CHAT_PATH, post(inspect))).await;
    let result = client_for(&endpoint).send("hi").await.unwrap();
    assert_eq!(result.text(), "envelope ok");
}

#[tokio::test]
async fn test_error_status_carries_reason_and_body() {
    let app = Router::new().route(
        CHAT_PATH,
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );
    let endpoint = spawn_agent(app).await;

    let err = client_for(&endpoint).send("hi").await.unwrap_err();
    assert_eq!(
        err,
        TransportError::status(500, "Internal Server Error", "upstream exploded")
    );
}

#[tokio::test]
async fn test_wrong_token_is_rejected_with_401() {
    let endpoint = spawn_agent(Router::new().route(CHAT_PATH, post(echo_completion))).await;
    let client = AgentClient::new(ChatConfig::new(endpoint.as_str(), "wrong").unwrap());

    match client.send("hi").await {
        Err(TransportError::Status { status, body, .. }) => {
            assert_eq!(status, 401);
            assert!(body.contains("bad token"));
        }
        other => panic!("expected 401, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let app = Router::new().route(CHAT_PATH, post(|| async { "definitely not json" }));
    let endpoint = spawn_agent(app).await;

    let err = client_for(&endpoint).send("hi").await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

/// Agent that reads one request, sends a 500 promising more body than it
/// writes, then hangs up
async fn spawn_truncating_agent() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| l.to_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_unreadable_error_body_is_marked() {
    let endpoint = spawn_truncating_agent().await;

    match client_for(&endpoint).send("hi").await {
        Err(TransportError::Status {
            status,
            status_text,
            body,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
            assert_eq!(body, UNREADABLE_BODY);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    let client = client_for(&format!("http://127.0.0.1:{}", unused_port()));
    let err = client.send("hi").await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn test_retrieval_reply_with_guardrails() {
    let app = Router::new().route(
        CHAT_PATH,
        post(|| async {
            Json(json!({
                "retrieval": {"retrieved_data": [
                    {"page_content": "clause_type: governing law,clause_text: Laws of Delaware", "filename": "msa.csv", "score": 0.91}
                ]},
                "guardrails": {"triggered_guardrails": [{"rule_name": "pii", "message": "Email redacted"}]}
            }))
        }),
    );
    let endpoint = spawn_agent(app).await;

    let text = client_for(&endpoint).send("governing law?").await.unwrap();
    let text = text.text();
    assert!(text.contains("**Governing law Clauses:**"));
    assert!(text.contains("**Source:** msa.csv (Relevance: 0.9)"));
    assert!(text.ends_with("**Content Moderation Notes:**\n- pii: Email redacted\n"));
}

#[tokio::test]
async fn test_health_uses_first_successful_path() {
    let app = Router::new()
        .route("/health", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/api/health",
            get(|headers: HeaderMap| async move {
                if authorized(&headers) {
                    StatusCode::OK
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }),
        );
    let endpoint = spawn_agent(app).await;

    assert_eq!(
        client_for(&endpoint).probe_health().await,
        ConnectionState::Connected
    );
}

#[tokio::test]
async fn test_health_paths_are_configurable() {
    let app = Router::new().route("/healthz", get(|| async { "ok" }));
    let endpoint = spawn_agent(app).await;

    let default_client = client_for(&endpoint);
    assert_eq!(default_client.probe_health().await, ConnectionState::Error);

    let config = ChatConfig::new(endpoint.as_str(), API_KEY)
        .unwrap()
        .with_health_paths(vec!["healthz".to_string()])
        .unwrap();
    assert_eq!(
        AgentClient::new(config).probe_health().await,
        ConnectionState::Connected
    );
}

#[tokio::test]
async fn test_health_all_refused_is_error() {
    let client = client_for(&format!("http://127.0.0.1:{}", unused_port()));
    assert_eq!(client.probe_health().await, ConnectionState::Error);
}

#[tokio::test]
async fn test_diagnostics_battery_against_agent() {
    async fn chat_probe(Json(body): Json<Value>) -> Json<Value> {
        let content = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
        Json(json!({"message": content}))
    }

    let app = Router::new()
        .route(CHAT_PATH, post(chat_probe))
        .route("/openapi.json", get(|| async { "y".repeat(300) }));
    let endpoint = spawn_agent(app).await;

    let report = client_for(&endpoint).run_diagnostics().await;
    assert_eq!(report.records.len(), 3);

    let chat = &report.records[0];
    assert_eq!(chat.method, "POST");
    assert_eq!(chat.url, format!("{}{}", endpoint, CHAT_PATH));
    match &chat.outcome {
        ProbeOutcome::Response { status, ok, preview, .. } => {
            assert_eq!(*status, 200);
            assert!(ok);
            match preview {
                Some(BodyPreview::Text(text)) => assert!(text.contains(DIAGNOSTIC_TEST_MESSAGE)),
                other => panic!("unexpected preview: {:?}", other),
            }
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // No /docs route: 404 and no preview
    assert_eq!(
        report.records[1].outcome,
        ProbeOutcome::Response {
            status: 404,
            status_text: "Not Found".to_string(),
            ok: false,
            preview: None,
        }
    );

    match &report.records[2].outcome {
        ProbeOutcome::Response {
            preview: Some(BodyPreview::Text(text)),
            ..
        } => {
            assert_eq!(text.chars().count(), 203);
            assert!(text.ends_with("..."));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let rendered = report.render();
    assert!(rendered.contains(&format!("⚠️ **GET {}/docs** - Status: 404 Not Found", endpoint)));
}

#[tokio::test]
async fn test_every_diagnostic_request_declares_json() {
    async fn strict(headers: HeaderMap) -> StatusCode {
        let json = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);
        if json {
            StatusCode::OK
        } else {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
    }

    let app = Router::new()
        .route(CHAT_PATH, post(strict))
        .route("/docs", get(strict))
        .route("/openapi.json", get(strict));
    let endpoint = spawn_agent(app).await;

    let report = client_for(&endpoint).run_diagnostics().await;
    for record in &report.records {
        match &record.outcome {
            ProbeOutcome::Response { status, .. } => {
                assert_eq!(*status, 200, "{} {}", record.method, record.url)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_diagnostics_with_agent_down() {
    let client = client_for(&format!("http://127.0.0.1:{}", unused_port()));
    let report = client.run_diagnostics().await;
    assert_eq!(report.records.len(), 3);
    assert!(report
        .records
        .iter()
        .all(|r| matches!(r.outcome, ProbeOutcome::Failed(_))));
}

#[tokio::test]
async fn test_controller_round_trip_over_http() {
    let endpoint = spawn_agent(Router::new().route(CHAT_PATH, post(echo_completion))).await;
    let controller = ChatController::new(Arc::new(client_for(&endpoint)));

    match controller.submit("Is this EULA perpetual?").await {
        ExchangeOutcome::Replied(reply) => {
            assert_eq!(reply.text, "echo: Is this EULA perpetual?");
            assert!(!reply.is_error);
        }
        ExchangeOutcome::Rejected => panic!("exchange rejected"),
    }
    assert_eq!(controller.status(), ConnectionState::Connected);
    assert!(!controller.is_busy());
}
