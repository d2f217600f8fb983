//! End-to-end split through the relayed transport.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use go_split::prelude::*;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn text_body(text: &str) -> String {
    json!({"content": [{"type": "text", "text": text}]}).to_string()
}

#[tokio::test]
async fn split_over_relay() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut server = mockito::Server::new_async().await;
    let plan = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::PartialJson(json!({"max_tokens": 500})))
        .with_status(200)
        .with_body(text_body("[\"types.go\"]"))
        .expect(1)
        .create_async()
        .await;
    let source = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::PartialJson(json!({"max_tokens": 3000})))
        .with_status(200)
        .with_body(text_body("```go\npackage big\n\ntype T struct{}\n```"))
        .expect(1)
        .create_async()
        .await;
    let stubs = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::PartialJson(json!({"max_tokens": 2000})))
        .with_status(200)
        .with_body(text_body("package big\n\nfunc TestT(t *testing.T) { t.Skip() }"))
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig::new()
        .with_endpoint(format!("{}/v1/messages", server.url()))
        .with_model("test-model")
        .with_timeout(Duration::from_secs(10))
        .with_retry(RetryPolicy::default().with_base_delay(Duration::from_millis(10)));
    let splitter = Splitter::new(config).unwrap();
    assert!(!splitter.caller().is_direct());

    let report = splitter
        .split(&SplitRequest::new(SourceFile::new(
            "big.go",
            "package big\n\ntype T struct{}",
        )))
        .await
        .unwrap();

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].name, "types.go");
    assert_eq!(report.files[0].contents, "package big\n\ntype T struct{}");
    assert_eq!(report.files[1].name, "types_test.go");
    assert!(report.is_complete());

    plan.assert_async().await;
    source.assert_async().await;
    stubs.assert_async().await;
}

#[test]
fn invalid_config_is_reported() {
    let err = Splitter::new(ClientConfig::new().with_endpoint("not a url")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
