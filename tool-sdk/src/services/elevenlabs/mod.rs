//! ElevenLabs text-to-speech client

mod models;
pub use models::*;

use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, ensure_success, join_url, UserAgent};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const SERVICE: &str = "elevenlabs";

#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn builder() -> ElevenLabsClientBuilder {
        ElevenLabsClientBuilder::default()
    }

    /// Synthesizes speech and returns the raw `audio/mpeg` bytes.
    pub async fn text_to_speech(&self, voice_id: &str, request: &TextToSpeechRequest) -> Result<Vec<u8>> {
        let endpoint = format!("text-to-speech/{}", voice_id);
        tracing::debug!(voice_id, chars = request.text.len(), "requesting speech synthesis");

        let response = self
            .http_client
            .post(join_url(&self.base_url, &endpoint))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(request)
            .send()
            .await?;

        let bytes = ensure_success(SERVICE, "text-to-speech", response)
            .await?
            .bytes()
            .await?;

        if bytes.is_empty() {
            return Err(ServiceError::parsing("Empty audio response"));
        }
        Ok(bytes.to_vec())
    }
}

#[derive(Default)]
pub struct ElevenLabsClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ElevenLabsClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ElevenLabsClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::validation("API key is required"))?;

        Ok(ElevenLabsClient {
            http_client: build_http_client(
                Some(UserAgent::for_client("elevenlabs")),
                Some(self.timeout.unwrap_or(Duration::from_secs(30))),
            )?,
            api_key,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}
