//! Mock tests for the Anthropic client

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::ServiceError;
use crate::services::anthropic::AnthropicClient;

fn create_test_client(mock_server: &MockServer) -> AnthropicClient {
    AnthropicClient::builder()
        .api_key("mock_api_key_for_testing")
        .base_url(mock_server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build Anthropic client")
}

#[tokio::test]
async fn test_complete_returns_first_text_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "mock_api_key_for_testing"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-sonnet-20240229",
            "max_tokens": 200,
            "system": "be safe",
            "messages": [{"role": "user", "content": "fix it"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-sonnet-20240229",
            "content": [{"type": "text", "text": "Guard the lookup with dict.get."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 9}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let text = client
        .complete("claude-3-sonnet-20240229", Some("be safe"), "fix it", 200)
        .await
        .unwrap();

    assert_eq!(text, "Guard the lookup with dict.get.");
}

#[tokio::test]
async fn test_system_prompt_is_omitted_when_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_02",
            "content": [{"type": "text", "text": "ok"}]
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    client.complete("m", None, "hi", 10).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("system").is_none());
}

#[tokio::test]
async fn test_authentication_error_is_mapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.complete("m", None, "hi", 10).await.unwrap_err();

    assert!(matches!(err.root(), ServiceError::Authentication(m) if m == "invalid x-api-key"));
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.service_name(), Some("anthropic"));
    assert_eq!(err.error_code(), Some("authentication_error"));
}

#[tokio::test]
async fn test_response_without_text_is_a_parsing_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_03",
            "content": []
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.complete("m", None, "hi", 10).await.unwrap_err();
    assert!(matches!(err.root(), ServiceError::Parsing(_)));
}

#[test]
fn test_builder_requires_api_key() {
    let err = AnthropicClient::builder().build().unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}
