//! Anthropic API client implementation
//!
//! Thin typed client for the Messages API, used to draft remediation plans
//! and patches.

mod models;
pub use models::*;

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, ensure_success, join_url, UserAgent};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";
const SERVICE: &str = "anthropic";

/// Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Create a new builder for the Anthropic client
    pub fn builder() -> AnthropicClientBuilder {
        AnthropicClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a Messages API request
    pub async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let endpoint = "v1/messages";
        let url = join_url(&self.base_url, endpoint);
        debug!("Sending request to Anthropic: POST {} (model {})", url, request.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await?;

        let response = ensure_success(SERVICE, endpoint, response).await?;
        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse response: {}", e)))
    }

    /// Single-turn completion returning the first text block
    pub async fn complete(
        &self,
        model: &str,
        system: Option<&str>,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let request = MessagesRequest {
            model: model.to_string(),
            max_tokens,
            system: system.map(str::to_string),
            messages: vec![Message::user(prompt)],
            temperature: None,
        };

        let response = self.create_message(&request).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::parsing("No text content in Anthropic response"))
    }
}

/// Builder for Anthropic client
#[derive(Default)]
pub struct AnthropicClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl AnthropicClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn build(self) -> Result<AnthropicClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::validation("API key is required"))?;

        let http_client = build_http_client(
            Some(UserAgent::for_client("anthropic")),
            Some(self.timeout.unwrap_or(Duration::from_secs(15))),
        )?;

        Ok(AnthropicClient {
            http_client,
            api_key,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}
