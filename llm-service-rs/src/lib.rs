// llm-service-rs/src/lib.rs
// Plan and patch generation. The live generator asks Claude and degrades to
// fallback text when the call fails; the simulated one never leaves the
// process.

pub mod prompts;
pub mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use config_rs::LlmConfig;
use shared_types_rs::diff::{hunks_match_headers, looks_like_unified_diff};
use shared_types_rs::{CollaboratorError, CollaboratorMode, Incident, PlanPatchGenerator};
use tool_sdk::anthropic::AnthropicClient;

pub struct ClaudePlanner {
    client: AnthropicClient,
    model: String,
    plan_max_tokens: u32,
    patch_max_tokens: u32,
}

impl ClaudePlanner {
    pub fn new(client: AnthropicClient, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            plan_max_tokens: config.plan_max_tokens,
            patch_max_tokens: config.patch_max_tokens,
        }
    }
}

#[async_trait]
impl PlanPatchGenerator for ClaudePlanner {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Live
    }

    async fn plan(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        let prompt = prompts::plan_prompt(incident);
        match self
            .client
            .complete(&self.model, None, &prompt, self.plan_max_tokens)
            .await
        {
            Ok(plan) => {
                info!(incident_id = %incident.id, "plan received from Claude");
                Ok(plan.trim().to_string())
            }
            Err(e) => {
                warn!(incident_id = %incident.id, error = %e, "plan request failed, using fallback plan");
                Ok(simulated::fallback_plan(incident))
            }
        }
    }

    async fn patch(&self, incident: &Incident, plan: &str) -> Result<String, CollaboratorError> {
        let prompt = prompts::patch_prompt(incident, plan);
        let reply = self
            .client
            .complete(
                &self.model,
                Some(prompts::PATCH_SYSTEM_PROMPT),
                &prompt,
                self.patch_max_tokens,
            )
            .await;

        match reply {
            Ok(text) => {
                let patch = prompts::strip_code_fences(&text);
                if looks_like_unified_diff(&patch) && hunks_match_headers(&patch) {
                    info!(incident_id = %incident.id, "patch received from Claude");
                    Ok(patch)
                } else {
                    warn!(incident_id = %incident.id, "Claude reply is not an applicable unified diff, using fallback patch");
                    Ok(simulated::fallback_patch(incident))
                }
            }
            Err(e) => {
                warn!(incident_id = %incident.id, error = %e, "patch request failed, using fallback patch");
                Ok(simulated::fallback_patch(incident))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulatedPlanner;

#[async_trait]
impl PlanPatchGenerator for SimulatedPlanner {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Simulated
    }

    async fn plan(&self, incident: &Incident) -> Result<String, CollaboratorError> {
        warn!(incident_id = %incident.id, "Claude API key not found, returning mock plan");
        Ok(simulated::mock_plan(incident))
    }

    async fn patch(&self, incident: &Incident, _plan: &str) -> Result<String, CollaboratorError> {
        warn!(incident_id = %incident.id, "Claude API key not found, returning mock patch");
        Ok(simulated::mock_patch(incident))
    }
}

pub fn from_config(config: &LlmConfig) -> Arc<dyn PlanPatchGenerator> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Arc::new(SimulatedPlanner);
    };
    match AnthropicClient::builder()
        .api_key(api_key)
        .base_url(config.api_url.clone())
        .timeout(config.timeout)
        .build()
    {
        Ok(client) => Arc::new(ClaudePlanner::new(client, config)),
        Err(e) => {
            warn!(error = %e, "could not build Anthropic client, planner simulated");
            Arc::new(SimulatedPlanner)
        }
    }
}
