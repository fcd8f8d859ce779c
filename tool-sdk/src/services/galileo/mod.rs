//! Galileo log stream client

mod models;
pub use models::*;

use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, ensure_success, UserAgent};

pub const DEFAULT_LOGS_URL: &str = "https://api.galileo.ai/v1/logs";
const SERVICE: &str = "galileo";

#[derive(Debug, Clone)]
pub struct GalileoClient {
    http_client: Client,
    api_key: String,
    logs_url: String,
}

impl GalileoClient {
    pub fn builder() -> GalileoClientBuilder {
        GalileoClientBuilder::default()
    }

    /// Posts one record; returns the HTTP status the stream answered with.
    pub async fn send_log(&self, record: &LogRecord) -> Result<u16> {
        tracing::debug!(url = %self.logs_url, "posting log record");
        let response = self
            .http_client
            .post(&self.logs_url)
            .bearer_auth(&self.api_key)
            .json(record)
            .send()
            .await?;

        let response = ensure_success(SERVICE, "logs", response).await?;
        Ok(response.status().as_u16())
    }
}

#[derive(Default)]
pub struct GalileoClientBuilder {
    api_key: Option<String>,
    logs_url: Option<String>,
    timeout: Option<Duration>,
}

impl GalileoClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full URL of the log ingestion endpoint
    pub fn logs_url(mut self, url: impl Into<String>) -> Self {
        self.logs_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GalileoClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::validation("API key is required"))?;

        Ok(GalileoClient {
            http_client: build_http_client(
                Some(UserAgent::for_client("galileo")),
                Some(self.timeout.unwrap_or(Duration::from_secs(5))),
            )?,
            api_key,
            logs_url: self.logs_url.unwrap_or_else(|| DEFAULT_LOGS_URL.to_string()),
        })
    }
}
