//! Daytona sandbox API client
//!
//! Covers the subset of the API needed to test a patch: create a sandbox,
//! clone a repository into it, upload a file, run a command, delete it.

mod models;
pub use models::*;

use std::time::Duration;

use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, ensure_success, join_url, UserAgent};

pub const DEFAULT_BASE_URL: &str = "https://app.daytona.io/api";
const SERVICE: &str = "daytona";

#[derive(Debug, Clone)]
pub struct DaytonaClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl DaytonaClient {
    pub fn builder() -> DaytonaClientBuilder {
        DaytonaClientBuilder::default()
    }

    fn toolbox(&self, sandbox_id: &str, path: &str) -> String {
        join_url(
            &self.base_url,
            &format!("toolbox/{}/toolbox/{}", sandbox_id, path),
        )
    }

    pub async fn create_sandbox(&self, request: &CreateSandboxRequest) -> Result<Sandbox> {
        let url = join_url(&self.base_url, "sandbox");
        debug!("Creating Daytona sandbox {:?}", request.name);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        ensure_success(SERVICE, "sandbox", response)
            .await?
            .json::<Sandbox>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse sandbox: {}", e)))
    }

    pub async fn delete_sandbox(&self, sandbox_id: &str) -> Result<()> {
        let url = join_url(&self.base_url, &format!("sandbox/{}", sandbox_id));
        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .query(&[("force", "true")])
            .send()
            .await?;

        ensure_success(SERVICE, "sandbox", response).await?;
        Ok(())
    }

    pub async fn git_clone(&self, sandbox_id: &str, request: &GitCloneRequest) -> Result<()> {
        let response = self
            .http_client
            .post(self.toolbox(sandbox_id, "git/clone"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        ensure_success(SERVICE, "git/clone", response).await?;
        Ok(())
    }

    /// Writes `contents` to `path` inside the sandbox.
    pub async fn upload_file(&self, sandbox_id: &str, path: &str, contents: Vec<u8>) -> Result<()> {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name));

        let response = self
            .http_client
            .post(self.toolbox(sandbox_id, "files/upload"))
            .bearer_auth(&self.api_key)
            .query(&[("path", path)])
            .multipart(form)
            .send()
            .await?;

        ensure_success(SERVICE, "files/upload", response).await?;
        Ok(())
    }

    pub async fn execute(&self, sandbox_id: &str, request: &ExecuteRequest) -> Result<ExecuteResponse> {
        debug!("Executing in sandbox {}: {}", sandbox_id, request.command);
        let response = self
            .http_client
            .post(self.toolbox(sandbox_id, "process/execute"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        ensure_success(SERVICE, "process/execute", response)
            .await?
            .json::<ExecuteResponse>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse execute response: {}", e)))
    }
}

#[derive(Default)]
pub struct DaytonaClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl DaytonaClientBuilder {
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

    pub fn build(self) -> Result<DaytonaClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::validation("API key is required"))?;

        Ok(DaytonaClient {
            // Sandbox creation and clones are slow; give them room.
            http_client: build_http_client(
                Some(UserAgent::for_client("daytona")),
                Some(self.timeout.unwrap_or(Duration::from_secs(120))),
            )?,
            api_key,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}
