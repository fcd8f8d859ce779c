//! Error mapping for service-specific APIs
//!
//! Providers report failures in slightly different JSON shapes. These
//! helpers pull the human-readable message (and error code, when there is
//! one) out of each shape and classify the failure by HTTP status.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};

/// `{"type": "error", "error": {"type": "...", "message": "..."}}`
fn anthropic_message(json: &Value, context: &mut ErrorContext) -> Option<String> {
    let error = json.get("error")?;
    if let Some(error_type) = error.get("type").and_then(|t| t.as_str()) {
        context.error_code = Some(error_type.to_string());
    }
    error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// `{"detail": {"status": "...", "message": "..."}}` or `{"detail": "..."}`
fn elevenlabs_message(json: &Value, context: &mut ErrorContext) -> Option<String> {
    let detail = json.get("detail")?;
    if let Some(text) = detail.as_str() {
        return Some(text.to_string());
    }
    if let Some(status) = detail.get("status").and_then(|s| s.as_str()) {
        context.error_code = Some(status.to_string());
    }
    detail
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// `{"message": "..."}`, `{"error": "..."}` or `{"detail": "..."}`
fn generic_message(json: &Value) -> Option<String> {
    ["message", "error", "detail"].iter().find_map(|key| {
        json.get(*key)
            .and_then(|m| m.as_str())
            .map(str::to_string)
    })
}

fn classify(status: StatusCode, message: String) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::rate_limit(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::validation(message)
        }
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ServiceError::timeout(message)
        }
        _ => ServiceError::service(message),
    }
}

/// Map a non-success HTTP response to a ServiceError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> ServiceError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let message = match context.service.as_str() {
            "anthropic" => anthropic_message(&json, context),
            "elevenlabs" => elevenlabs_message(&json, context),
            _ => None,
        }
        .or_else(|| generic_message(&json));

        if let Some(message) = message {
            return classify(status, message);
        }
    }

    // Fallback to status-based mapping
    let message = if body.is_empty() {
        status.to_string()
    } else if body.chars().count() > 100 {
        format!("{}: {}...", status, body.chars().take(100).collect::<String>())
    } else {
        format!("{}: {}", status, body)
    };

    classify(status, message)
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 | 422 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 | 504 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anthropic_errors_carry_type_as_code() {
        let mut context = ErrorContext::for_service("anthropic");
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = map_http_error(StatusCode::UNAUTHORIZED, body, &mut context);
        assert!(matches!(err, ServiceError::Authentication(ref m) if m == "invalid x-api-key"));
        assert_eq!(context.error_code.as_deref(), Some("authentication_error"));
    }

    #[test]
    fn elevenlabs_detail_is_unwrapped() {
        let mut context = ErrorContext::for_service("elevenlabs");
        let body = r#"{"detail":{"status":"quota_exceeded","message":"out of credits"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body, &mut context);
        assert!(matches!(err, ServiceError::RateLimit(ref m) if m == "out of credits"));
        assert_eq!(context.error_code.as_deref(), Some("quota_exceeded"));
    }

    #[test]
    fn github_message_field_is_used() {
        let mut context = ErrorContext::for_service("github");
        let err = map_http_error(
            StatusCode::NOT_FOUND,
            r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#,
            &mut context,
        );
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Not Found"));
    }

    #[test]
    fn plain_text_bodies_are_truncated() {
        let mut context = ErrorContext::for_service("daytona");
        let body = "x".repeat(300);
        let err = map_http_error(StatusCode::BAD_GATEWAY, &body, &mut context);
        match err {
            ServiceError::Service(message) => assert!(message.len() < 150),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn classification_labels() {
        assert_eq!(classify_http_error(StatusCode::UNPROCESSABLE_ENTITY), "validation");
        assert_eq!(classify_http_error(StatusCode::SERVICE_UNAVAILABLE), "server");
    }
}
