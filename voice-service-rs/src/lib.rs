// voice-service-rs/src/lib.rs
// Voice summary of a finished incident. Live audio is stored inline as a
// base64 data URI so no separate blob storage is needed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use config_rs::SpeechConfig;
use shared_types_rs::simulated::MOCK_AUDIO_MARKER;
use shared_types_rs::{
    summary_text, AudioReference, CollaboratorError, CollaboratorMode, Incident, VoiceSummarizer,
};
use tool_sdk::elevenlabs::{ElevenLabsClient, TextToSpeechRequest};

pub fn simulated_audio_reference(incident: &Incident) -> String {
    format!(
        "data:audio/mpeg;base64,{}{}",
        MOCK_AUDIO_MARKER,
        incident.id.short()
    )
}

pub struct ElevenLabsSummarizer {
    client: ElevenLabsClient,
    voice_id: String,
}

impl ElevenLabsSummarizer {
    pub fn new(client: ElevenLabsClient, voice_id: impl Into<String>) -> Self {
        Self {
            client,
            voice_id: voice_id.into(),
        }
    }
}

#[async_trait]
impl VoiceSummarizer for ElevenLabsSummarizer {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Live
    }

    async fn synthesize(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        let request = TextToSpeechRequest::new(summary_text(incident));
        match self.client.text_to_speech(&self.voice_id, &request).await {
            Ok(audio) => {
                info!(incident_id = %incident.id, bytes = audio.len(), "voice summary synthesized");
                Ok(AudioReference::inline_data_uri(&audio))
            }
            Err(e) => {
                warn!(incident_id = %incident.id, error = %e, "ElevenLabs synthesis failed, using mock audio");
                Ok(simulated_audio_reference(incident))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulatedSummarizer;

#[async_trait]
impl VoiceSummarizer for SimulatedSummarizer {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Simulated
    }

    async fn synthesize(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        warn!(incident_id = %incident.id, "ElevenLabs API key not found, returning mock audio");
        Ok(simulated_audio_reference(incident))
    }
}

pub fn from_config(config: &SpeechConfig) -> Arc<dyn VoiceSummarizer> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Arc::new(SimulatedSummarizer);
    };
    match ElevenLabsClient::builder()
        .api_key(api_key)
        .base_url(config.api_url.clone())
        .timeout(config.timeout)
        .build()
    {
        Ok(client) => Arc::new(ElevenLabsSummarizer::new(client, config.voice_id.clone())),
        Err(e) => {
            warn!(error = %e, "could not build ElevenLabs client, voice summaries simulated");
            Arc::new(SimulatedSummarizer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types_rs::simulated::is_simulated;
    use shared_types_rs::ErrorReport;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn incident() -> Incident {
        let mut incident = Incident::from_report(ErrorReport {
            filename: "app.py".into(),
            error_type: "KeyError".into(),
            message: "'customer'".into(),
            traceback: String::new(),
            code: String::new(),
        });
        incident.tests_passed = Some(true);
        incident
    }

    fn config(api_url: Option<String>) -> SpeechConfig {
        SpeechConfig {
            api_key: api_url.as_ref().map(|_| "xi-key".to_string()),
            api_url: api_url.unwrap_or_default(),
            voice_id: "voice-1".into(),
            timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test]
    async fn simulated_reference_is_marked() {
        let incident = incident();
        let summarizer = from_config(&config(None));
        assert_eq!(summarizer.mode(), CollaboratorMode::Simulated);

        let reference = summarizer.synthesize(&incident).await.unwrap();
        assert_eq!(
            reference,
            format!("data:audio/mpeg;base64,mock-audio-{}", incident.id.short())
        );
        assert!(is_simulated(&reference));
        assert_eq!(AudioReference::classify(&reference), AudioReference::Simulated);
    }

    #[tokio::test]
    async fn live_audio_is_stored_inline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/voice-1"))
            .and(header("xi-api-key", "xi-key"))
            .and(body_partial_json(json!({"model_id": "eleven_monolingual_v1"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let summarizer = from_config(&config(Some(server.uri())));
        assert_eq!(summarizer.mode(), CollaboratorMode::Live);

        let reference = summarizer.synthesize(&incident()).await.unwrap();
        assert_eq!(
            AudioReference::classify(&reference),
            AudioReference::Inline(b"ID3audio".to_vec())
        );
    }

    #[tokio::test]
    async fn provider_errors_fall_back_to_mock_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": {"status": "invalid_api_key", "message": "Invalid API key"}
            })))
            .mount(&server)
            .await;

        let reference = from_config(&config(Some(server.uri())))
            .synthesize(&incident())
            .await
            .unwrap();
        assert!(is_simulated(&reference));
    }
}
