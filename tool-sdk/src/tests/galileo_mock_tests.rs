//! Mock tests for the Galileo log stream client

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::ServiceError;
use crate::services::galileo::{GalileoClient, LogLevel, LogRecord};

fn record() -> LogRecord {
    LogRecord {
        timestamp: Utc::now(),
        level: LogLevel::Error,
        message: "Auto-ops incident: KeyError in a.py".to_string(),
        metadata: json!({"incident_id": "abc"}),
        tags: vec!["python".to_string(), "keyerror".to_string()],
    }
}

fn create_test_client(mock_server: &MockServer) -> GalileoClient {
    GalileoClient::builder()
        .api_key("galileo_key")
        .logs_url(format!("{}/v1/logs", mock_server.uri()))
        .build()
        .expect("Failed to build Galileo client")
}

#[tokio::test]
async fn test_send_log_posts_record_with_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/logs"))
        .and(header("Authorization", "Bearer galileo_key"))
        .and(body_partial_json(json!({
            "level": "error",
            "message": "Auto-ops incident: KeyError in a.py",
            "tags": ["python", "keyerror"]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = create_test_client(&mock_server).send_log(&record()).await.unwrap();
    assert_eq!(status, 202);
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/logs"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"detail": "slow down"})))
        .mount(&mock_server)
        .await;

    let err = create_test_client(&mock_server)
        .send_log(&record())
        .await
        .unwrap_err();
    assert!(matches!(err.root(), ServiceError::RateLimit(m) if m == "slow down"));
}
