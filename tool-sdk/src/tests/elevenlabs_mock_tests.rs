//! Mock tests for the ElevenLabs client

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::ServiceError;
use crate::services::elevenlabs::{ElevenLabsClient, TextToSpeechRequest, DEFAULT_VOICE_ID};

fn create_test_client(mock_server: &MockServer) -> ElevenLabsClient {
    ElevenLabsClient::builder()
        .api_key("xi_test")
        .base_url(format!("{}/v1", mock_server.uri()))
        .build()
        .expect("Failed to build ElevenLabs client")
}

#[tokio::test]
async fn test_text_to_speech_returns_audio_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/text-to-speech/{}", DEFAULT_VOICE_ID)))
        .and(header("xi-api-key", "xi_test"))
        .and(header("Accept", "audio/mpeg"))
        .and(body_partial_json(json!({
            "text": "All done.",
            "model_id": "eleven_monolingual_v1",
            "voice_settings": {"use_speaker_boost": true}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "audio/mpeg")
                .set_body_bytes(b"ID3\x03fake-mp3".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let audio = create_test_client(&mock_server)
        .text_to_speech(DEFAULT_VOICE_ID, &TextToSpeechRequest::new("All done."))
        .await
        .unwrap();
    assert_eq!(audio, b"ID3\x03fake-mp3".to_vec());
}

#[tokio::test]
async fn test_empty_audio_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let err = create_test_client(&mock_server)
        .text_to_speech("voice", &TextToSpeechRequest::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Parsing(_)));
}

#[tokio::test]
async fn test_quota_detail_is_unwrapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": {"status": "quota_exceeded", "message": "This request exceeds your quota."}
        })))
        .mount(&mock_server)
        .await;

    let err = create_test_client(&mock_server)
        .text_to_speech("voice", &TextToSpeechRequest::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(err.root(), ServiceError::Authentication(_)));
    assert_eq!(err.error_code(), Some("quota_exceeded"));
}
