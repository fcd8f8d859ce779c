//! shared-types-rs
//! Incident data model, workflow status machine and the capability traits
//! implemented by every external collaborator of the auto-ops workflow.

pub mod audio;
pub mod collaborators;
pub mod diff;
pub mod error;
pub mod incident;
pub mod simulated;
pub mod timeline;

pub use audio::{summary_text, AudioReference};
pub use collaborators::{
    Collaborator, CollaboratorMode, IncidentStore, LogSink, PlanPatchGenerator, PullRequestOpener,
    SandboxTester, TestOutcome, VoiceSummarizer,
};
pub use error::{CollaboratorError, StoreError, ValidationError, WorkflowError};
pub use incident::{
    sort_newest_first, ErrorReport, ErrorReportPayload, Incident, IncidentId, IncidentStatus,
};
pub use timeline::{derive_timeline, StepState, TimelineEntry};

pub type Result<T> = std::result::Result<T, WorkflowError>;
