// code-host-rs/src/lib.rs
// Pull-request opener adapters for the manual completion step.

pub mod github;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use config_rs::CodeHostConfig;
use shared_types_rs::simulated::MOCK_PULL_REQUEST_MARKER;
use shared_types_rs::{CollaboratorError, CollaboratorMode, Incident, PullRequestOpener};
use tool_sdk::github::GitHubClient;

pub use github::GitHubPullRequestOpener;

/// Returns a marked pull-request URL under the configured repository.
#[derive(Debug, Clone)]
pub struct SimulatedPullRequestOpener {
    repository_url: String,
}

impl SimulatedPullRequestOpener {
    pub fn new(repository_url: &str) -> Self {
        Self {
            repository_url: repository_url
                .trim_end_matches('/')
                .trim_end_matches(".git")
                .to_string(),
        }
    }
}

#[async_trait]
impl PullRequestOpener for SimulatedPullRequestOpener {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Simulated
    }

    async fn open_pull_request(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        warn!(incident_id = %incident.id, "GitHub token not found, returning mock pull request");
        Ok(format!(
            "{}{}{}",
            self.repository_url,
            MOCK_PULL_REQUEST_MARKER,
            incident.id.short()
        ))
    }
}

pub fn from_config(config: &CodeHostConfig) -> Arc<dyn PullRequestOpener> {
    let simulated = || -> Arc<dyn PullRequestOpener> {
        Arc::new(SimulatedPullRequestOpener::new(&config.repository.url))
    };

    let Some(token) = config.token.as_deref() else {
        return simulated();
    };
    let Some((owner, repo)) = config.repository.slug() else {
        warn!(url = %config.repository.url, "repository URL has no owner/name, pull requests simulated");
        return simulated();
    };

    match GitHubClient::builder()
        .token(token)
        .base_url(config.api_url.clone())
        .build()
    {
        Ok(client) => Arc::new(GitHubPullRequestOpener::new(
            client,
            owner,
            repo,
            config.repository.branch.clone(),
        )),
        Err(e) => {
            warn!(error = %e, "could not build GitHub client, pull requests simulated");
            simulated()
        }
    }
}
