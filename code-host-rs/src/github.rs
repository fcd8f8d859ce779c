// code-host-rs/src/github.rs
// Opens a pull request carrying the incident patch on GitHub.

use async_trait::async_trait;
use tracing::info;

use shared_types_rs::{
    Collaborator, CollaboratorError, CollaboratorMode, Incident, PullRequestOpener,
};
use tool_sdk::github::{CreatePullRequest, GitHubClient};
use tool_sdk::ServiceError;

pub fn branch_name(incident: &Incident) -> String {
    format!("auto-ops/incident-{}", incident.id.short())
}

pub fn patch_path(incident: &Incident) -> String {
    format!("auto-ops/incident-{}.patch", incident.id)
}

pub fn pull_request_title(incident: &Incident) -> String {
    format!("AUTO-OPS: fix {} in {}", incident.error_type, incident.filename)
}

pub fn pull_request_body(incident: &Incident) -> String {
    let test_result = match incident.tests_passed {
        Some(true) => "passed",
        Some(false) => "failed",
        None => "not run",
    };

    format!(
        "## Incident {id}\n\n\
         **{error_type}** in `{filename}`: {message}\n\n\
         ### Plan\n\n{plan}\n\n\
         ### Sandbox test ({test_result})\n\n```\n{output}\n```\n\n\
         Sandbox: {sandbox}\n\n\
         The proposed diff is committed as `{patch_path}`.",
        id = incident.id,
        error_type = incident.error_type,
        filename = incident.filename,
        message = incident.message,
        plan = incident.plan.as_deref().unwrap_or("(no plan recorded)"),
        test_result = test_result,
        output = incident.test_output.as_deref().unwrap_or("").trim_end(),
        sandbox = incident.workspace_url.as_deref().unwrap_or("n/a"),
        patch_path = patch_path(incident),
    )
}

pub struct GitHubPullRequestOpener {
    client: GitHubClient,
    owner: String,
    repo: String,
    base_branch: String,
}

impl GitHubPullRequestOpener {
    pub fn new(client: GitHubClient, owner: String, repo: String, base_branch: String) -> Self {
        Self {
            client,
            owner,
            repo,
            base_branch,
        }
    }

    async fn open(&self, incident: &Incident, patch: &str) -> Result<String, ServiceError> {
        let base = self
            .client
            .get_branch_ref(&self.owner, &self.repo, &self.base_branch)
            .await?;

        let branch = branch_name(incident);
        self.client
            .create_branch(&self.owner, &self.repo, &branch, &base.object.sha)
            .await?;

        let message = format!(
            "AUTO-OPS: proposed patch for incident {}",
            incident.id.short()
        );
        self.client
            .put_file(
                &self.owner,
                &self.repo,
                &patch_path(incident),
                &branch,
                &message,
                patch.as_bytes(),
            )
            .await?;

        let request = CreatePullRequest {
            title: pull_request_title(incident),
            head: branch,
            base: self.base_branch.clone(),
            body: pull_request_body(incident),
        };
        let pr = self
            .client
            .create_pull_request(&self.owner, &self.repo, &request)
            .await?;
        Ok(pr.html_url)
    }
}

#[async_trait]
impl PullRequestOpener for GitHubPullRequestOpener {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Live
    }

    async fn open_pull_request(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        let patch = incident.patch.as_deref().ok_or_else(|| {
            CollaboratorError::new(Collaborator::PullRequestOpener, "incident has no patch")
        })?;

        let url = self
            .open(incident, patch)
            .await
            .map_err(|e| CollaboratorError::new(Collaborator::PullRequestOpener, e.to_string()))?;
        info!(incident_id = %incident.id, pr_url = %url, "pull request opened");
        Ok(url)
    }
}
