//! GitHub REST API client
//!
//! Only what opening a pull request from a single committed file needs:
//! read a branch head, create a branch, put a file, open the PR.

mod models;
pub use models::*;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;
use reqwest::{Client, RequestBuilder};

use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, ensure_success, join_url, UserAgent};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const SERVICE: &str = "github";

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http_client: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::default()
    }

    fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        join_url(&self.base_url, &format!("repos/{}/{}/{}", owner, repo, path))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn parse<T: serde::de::DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> Result<T> {
        ensure_success(SERVICE, endpoint, response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse {} response: {}", endpoint, e)))
    }

    /// Head of `refs/heads/<branch>`
    pub async fn get_branch_ref(&self, owner: &str, repo: &str, branch: &str) -> Result<GitRef> {
        let url = self.repo_url(owner, repo, &format!("git/ref/heads/{}", branch));
        debug!("Reading branch head: GET {}", url);
        let response = self.authorized(self.http_client.get(&url)).send().await?;
        Self::parse("git/ref", response).await
    }

    pub async fn create_branch(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<GitRef> {
        let request = CreateRefRequest {
            name: format!("refs/heads/{}", branch),
            sha: sha.to_string(),
        };
        let response = self
            .authorized(self.http_client.post(self.repo_url(owner, repo, "git/refs")))
            .json(&request)
            .send()
            .await?;
        Self::parse("git/refs", response).await
    }

    /// Creates `path` on `branch` with `contents`, as one commit.
    pub async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
        message: &str,
        contents: &[u8],
    ) -> Result<PutContentsResponse> {
        let request = PutContentsRequest {
            message: message.to_string(),
            content: STANDARD.encode(contents),
            branch: branch.to_string(),
            sha: None,
        };
        let url = self.repo_url(owner, repo, &format!("contents/{}", path));
        let response = self
            .authorized(self.http_client.put(&url))
            .json(&request)
            .send()
            .await?;
        Self::parse("contents", response).await
    }

    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: &CreatePullRequest,
    ) -> Result<PullRequest> {
        let response = self
            .authorized(self.http_client.post(self.repo_url(owner, repo, "pulls")))
            .json(request)
            .send()
            .await?;
        Self::parse("pulls", response).await
    }
}

#[derive(Default)]
pub struct GitHubClientBuilder {
    token: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GitHubClientBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
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

    pub fn build(self) -> Result<GitHubClient> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::validation("Token is required"))?;

        Ok(GitHubClient {
            http_client: build_http_client(
                Some(UserAgent::for_client("github")),
                Some(self.timeout.unwrap_or(Duration::from_secs(30))),
            )?,
            token,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}
