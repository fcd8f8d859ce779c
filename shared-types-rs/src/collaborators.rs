// shared-types-rs/src/collaborators.rs
// Capability traits for the store and every external collaborator

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CollaboratorError, StoreError};
use crate::incident::{Incident, IncidentId};

/// Which collaborator raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    LogSink,
    PlanGenerator,
    SandboxTester,
    PullRequestOpener,
    VoiceSummarizer,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::LogSink => "log sink",
            Collaborator::PlanGenerator => "plan generator",
            Collaborator::SandboxTester => "sandbox tester",
            Collaborator::PullRequestOpener => "pull request opener",
            Collaborator::VoiceSummarizer => "voice summarizer",
        };
        f.write_str(name)
    }
}

/// Whether an adapter talks to its real service or fabricates results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorMode {
    Live,
    Simulated,
}

impl CollaboratorMode {
    pub fn is_live(&self) -> bool {
        matches!(self, CollaboratorMode::Live)
    }
}

/// Result of running a patch in a sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub success: bool,
    pub output: String,
}

#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Inserts or replaces the record keyed by its id.
    async fn put(&self, incident: &Incident) -> Result<(), StoreError>;

    async fn get(&self, id: IncidentId) -> Result<Option<Incident>, StoreError>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Incident>, StoreError>;

    /// Removes every record and returns how many were removed.
    async fn clear(&self) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait LogSink: Send + Sync {
    fn mode(&self) -> CollaboratorMode;

    async fn log(&self, incident: &Incident) -> Result<(), CollaboratorError>;
}

#[async_trait]
pub trait PlanPatchGenerator: Send + Sync {
    fn mode(&self) -> CollaboratorMode;

    async fn plan(&self, incident: &Incident) -> Result<String, CollaboratorError>;

    async fn patch(&self, incident: &Incident, plan: &str) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait SandboxTester: Send + Sync {
    fn mode(&self) -> CollaboratorMode;

    /// Provisions an isolated workspace and returns its URL.
    async fn start_sandbox(&self, incident: &Incident) -> Result<String, CollaboratorError>;

    async fn test_patch(&self, incident: &Incident) -> Result<TestOutcome, CollaboratorError>;
}

#[async_trait]
pub trait PullRequestOpener: Send + Sync {
    fn mode(&self) -> CollaboratorMode;

    /// Opens a change request carrying the incident's patch; returns its URL.
    async fn open_pull_request(&self, incident: &Incident) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait VoiceSummarizer: Send + Sync {
    fn mode(&self) -> CollaboratorMode;

    /// Returns a reference to synthesized audio (data URI or URL).
    async fn synthesize(&self, incident: &Incident) -> Result<String, CollaboratorError>;
}
