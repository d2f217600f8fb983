//! HTTP-level tests for both transport strategies and the retry loop.
//!
//! Each test runs against a local mock server, so no network access or API
//! key is needed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mockito::Matcher;
use serde_json::json;
use split_client::config::{ENDPOINT_ENV_VAR, TIMEOUT_ENV_VAR};
use split_client::{CallError, ClientConfig, FailureKind, ResilientCaller, RetryPolicy};
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Short backoff so retry tests finish quickly.
fn fast_retry() -> RetryPolicy {
    RetryPolicy::default().with_base_delay(Duration::from_millis(10))
}

fn relay_config(server: &mockito::Server) -> ClientConfig {
    ClientConfig::new()
        .with_endpoint(format!("{}/v1/messages", server.url()))
        .with_model("test-model")
        .with_timeout(Duration::from_secs(10))
        .with_retry(fast_retry())
}

fn text_body(text: &str) -> String {
    json!({"content": [{"type": "text", "text": text}]}).to_string()
}

#[tokio::test]
async fn relay_success_returns_first_text_block() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "test-model",
            "max_tokens": 100,
            "messages": [{"role": "user", "content": "Test prompt"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_body("Hello from test"))
        .expect(1)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    assert!(!caller.is_direct());

    let text = caller.call("Test prompt", 100).await.unwrap();
    assert_eq!(text, "Hello from test");
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_call_with_huge_env_timeout() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(text_body("still bounded"))
        .expect(1)
        .create_async()
        .await;

    let endpoint = format!("{}/v1/messages", server.url());
    let config = ClientConfig::from_lookup(|key| match key {
        TIMEOUT_ENV_VAR => Some(u64::MAX.to_string()),
        ENDPOINT_ENV_VAR => Some(endpoint.clone()),
        _ => None,
    });
    assert_eq!(config.timeout, Duration::from_secs(u64::MAX));

    let caller = ResilientCaller::new(config).unwrap();
    assert_eq!(caller.call("p", 10).await.unwrap(), "still bounded");
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_server_error_exhausts_attempts() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body(r#"{"error": {"message": "Internal error"}}"#)
        .expect(4)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    let err = caller.call("Test prompt", 100).await.unwrap_err();

    assert!(matches!(err, CallError::RetriesExhausted { attempts: 4, .. }));
    assert_eq!(err.kind(), FailureKind::ServerError);
    assert!(err.to_string().contains("Internal error"));
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_service_unavailable_exhausts_attempts() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(503)
        .expect(4)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    let err = caller.call("p", 10).await.unwrap_err();

    assert_eq!(err.attempts(), 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_bad_request_is_attempted_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(400)
        .with_body("unknown model")
        .expect(1)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    let err = caller.call("p", 10).await.unwrap_err();

    assert!(matches!(err, CallError::Terminal { attempts: 1, .. }));
    assert_eq!(err.kind(), FailureKind::ClientError);
    assert!(err.to_string().contains("unknown model"));
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_rate_limit_is_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(429)
        .with_body("slow down")
        .expect(4)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    let err = caller.call("p", 10).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::RateLimited);
    assert_eq!(err.failure().status(), Some(429));
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_empty_content_is_protocol_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(r#"{"content": []}"#)
        .expect(1)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    let err = caller.call("p", 10).await.unwrap_err();

    assert!(matches!(err, CallError::Terminal { attempts: 1, .. }));
    assert_eq!(err.kind(), FailureKind::Protocol);
    mock.assert_async().await;
}

#[tokio::test]
async fn relay_error_field_is_protocol_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(r#"{"content": [], "error": {"message": "wrapper exploded"}}"#)
        .create_async()
        .await;

    let caller = ResilientCaller::new(relay_config(&server)).unwrap();
    let err = caller.call("p", 10).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Protocol);
    assert!(err.to_string().contains("wrapper exploded"));
}

#[tokio::test]
async fn relay_timeout_is_cancelled_without_retry() {
    // Accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ClientConfig::new()
        .with_endpoint(format!("http://{addr}/v1/messages"))
        .with_model("test-model")
        .with_timeout(Duration::from_millis(200))
        .with_retry(fast_retry());
    let caller = ResilientCaller::new(config).unwrap();

    let err = caller.call("p", 10).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Cancelled);
    assert_eq!(err.attempts(), 1);
}

#[tokio::test]
async fn relay_connection_refused_is_retried() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new()
        .with_endpoint(format!("http://{addr}/v1/messages"))
        .with_model("test-model")
        .with_timeout(Duration::from_secs(10))
        .with_retry(fast_retry());
    let caller = ResilientCaller::new(config).unwrap();

    let err = caller.call("p", 10).await.unwrap_err();
    assert!(matches!(err, CallError::RetriesExhausted { attempts: 4, .. }));
    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn direct_success_sends_vendor_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({"model": "test-model", "max_tokens": 42})))
        .with_status(200)
        .with_body(
            json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "direct answer"}],
                "stop_reason": "end_turn"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig::new()
        .with_model("test-model")
        .with_api_key("sk-test")
        .with_api_base_url(server.url())
        .with_retry(fast_retry());
    let caller = ResilientCaller::new(config).unwrap();
    assert!(caller.is_direct());

    assert_eq!(caller.call("p", 42).await.unwrap(), "direct answer");
    mock.assert_async().await;
}

#[tokio::test]
async fn direct_overloaded_is_retried_with_vendor_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(529)
        .with_body(
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        )
        .expect(4)
        .create_async()
        .await;

    let config = ClientConfig::new()
        .with_api_key("sk-test")
        .with_api_base_url(server.url())
        .with_retry(fast_retry());
    let caller = ResilientCaller::new(config).unwrap();

    let err = caller.call("p", 10).await.unwrap_err();
    assert!(matches!(err, CallError::RetriesExhausted { attempts: 4, .. }));
    assert!(err.to_string().contains("overloaded_error: Overloaded"));
    mock.assert_async().await;
}

#[tokio::test]
async fn direct_auth_failure_is_terminal() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(
            r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig::new()
        .with_api_key("sk-wrong")
        .with_api_base_url(server.url())
        .with_retry(fast_retry());
    let caller = ResilientCaller::new(config).unwrap();

    let err = caller.call("p", 10).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::ClientError);
    assert_eq!(err.failure().status(), Some(401));
    mock.assert_async().await;
}

#[tokio::test]
async fn direct_non_text_block_is_protocol_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(r#"{"content":[{"type":"thinking","thinking":"hmm"}]}"#)
        .create_async()
        .await;

    let config = ClientConfig::new()
        .with_api_key("sk-test")
        .with_api_base_url(server.url());
    let caller = ResilientCaller::new(config).unwrap();

    let err = caller.call("p", 10).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Protocol);
    assert!(err.to_string().contains("type=thinking"));
}

#[tokio::test]
async fn capture_dir_receives_exchange() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(text_body("[\"types.go\"]"))
        .create_async()
        .await;

    let caller =
        ResilientCaller::new(relay_config(&server).with_capture_dir(temp.path().join("cap")))
            .unwrap();
    caller.call("plan the split", 500).await.unwrap();

    let mut contents: Vec<String> = std::fs::read_dir(temp.path().join("cap"))
        .unwrap()
        .map(|e| std::fs::read_to_string(e.unwrap().path()).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["[\"types.go\"]", "plan the split"]);
}
