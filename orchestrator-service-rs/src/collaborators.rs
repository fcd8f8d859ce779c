// orchestrator-service-rs/src/collaborators.rs
// Wiring of the store and the five external collaborators. Each adapter
// crate decides live vs simulated; the orchestrator never looks at
// credentials itself.

use std::sync::Arc;

use serde::Serialize;

use config_rs::AppConfig;
use incident_store_rs::MemoryIncidentStore;
use shared_types_rs::{
    CollaboratorMode, IncidentStore, LogSink, PlanPatchGenerator, PullRequestOpener,
    SandboxTester, VoiceSummarizer,
};

#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn IncidentStore>,
    pub log_sink: Arc<dyn LogSink>,
    pub planner: Arc<dyn PlanPatchGenerator>,
    pub sandbox: Arc<dyn SandboxTester>,
    pub pull_requests: Arc<dyn PullRequestOpener>,
    pub voice: Arc<dyn VoiceSummarizer>,
}

/// Which collaborators are live, reported on the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollaboratorModes {
    pub log_sink: CollaboratorMode,
    pub plan_generator: CollaboratorMode,
    pub sandbox_tester: CollaboratorMode,
    pub pull_request_opener: CollaboratorMode,
    pub voice_summarizer: CollaboratorMode,
}

impl Collaborators {
    pub fn from_config(config: &AppConfig, store: Arc<dyn IncidentStore>) -> Self {
        Self {
            store,
            log_sink: logging_service_rs::from_config(&config.log_sink),
            planner: llm_service_rs::from_config(&config.llm),
            sandbox: executor::from_config(&config.sandbox),
            pull_requests: code_host_rs::from_config(&config.code_host),
            voice: voice_service_rs::from_config(&config.speech),
        }
    }

    /// Every collaborator simulated, backed by an in-memory store.
    pub fn simulated() -> Self {
        Self {
            store: Arc::new(MemoryIncidentStore::new()),
            log_sink: Arc::new(logging_service_rs::SimulatedLogSink),
            planner: Arc::new(llm_service_rs::SimulatedPlanner),
            sandbox: Arc::new(executor::SimulatedSandboxTester),
            pull_requests: Arc::new(code_host_rs::SimulatedPullRequestOpener::new(
                "https://github.com/auto-ops/demo",
            )),
            voice: Arc::new(voice_service_rs::SimulatedSummarizer),
        }
    }

    pub fn modes(&self) -> CollaboratorModes {
        CollaboratorModes {
            log_sink: self.log_sink.mode(),
            plan_generator: self.planner.mode(),
            sandbox_tester: self.sandbox.mode(),
            pull_request_opener: self.pull_requests.mode(),
            voice_summarizer: self.voice.mode(),
        }
    }
}
