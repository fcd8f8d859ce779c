// shared-types-rs/src/incident.rs
// The incident record and its forward-only status machine

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, WorkflowError};

static TRACEBACK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"line (\d+)").expect("static regex"));

/// Opaque incident identifier, generated once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(Uuid);

impl IncidentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier received from outside; anything that is not a
    /// well-formed id simply cannot name an incident.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// First eight characters, used to name sandboxes, branches and mocks.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for IncidentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Workflow status. The declaration order of the main sequence is the
/// order in which an incident may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Received,
    Logged,
    Planned,
    PatchProposed,
    SandboxStarted,
    TestingPatch,
    TestedOk,
    TestFailed,
    TestsPassed,
    AwaitingApproval,
    PrCreated,
    Completed,
    Failed,
}

impl IncidentStatus {
    /// The main success sequence, `received` through `completed`.
    pub const PHASES: [IncidentStatus; 11] = [
        IncidentStatus::Received,
        IncidentStatus::Logged,
        IncidentStatus::Planned,
        IncidentStatus::PatchProposed,
        IncidentStatus::SandboxStarted,
        IncidentStatus::TestingPatch,
        IncidentStatus::TestedOk,
        IncidentStatus::TestsPassed,
        IncidentStatus::AwaitingApproval,
        IncidentStatus::PrCreated,
        IncidentStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Received => "received",
            IncidentStatus::Logged => "logged",
            IncidentStatus::Planned => "planned",
            IncidentStatus::PatchProposed => "patch_proposed",
            IncidentStatus::SandboxStarted => "sandbox_started",
            IncidentStatus::TestingPatch => "testing_patch",
            IncidentStatus::TestedOk => "tested_ok",
            IncidentStatus::TestFailed => "test_failed",
            IncidentStatus::TestsPassed => "tests_passed",
            IncidentStatus::AwaitingApproval => "awaiting_approval",
            IncidentStatus::PrCreated => "pr_created",
            IncidentStatus::Completed => "completed",
            IncidentStatus::Failed => "failed",
        }
    }

    /// Position in [`IncidentStatus::PHASES`]; `None` for the failure exits.
    pub fn phase_index(&self) -> Option<usize> {
        Self::PHASES.iter().position(|phase| phase == self)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, IncidentStatus::Failed | IncidentStatus::TestFailed)
    }

    /// No automatic or manual step leaves these states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IncidentStatus::Completed | IncidentStatus::Failed | IncidentStatus::TestFailed
        )
    }

    /// Manual completion is only accepted from here.
    pub fn is_completable(&self) -> bool {
        matches!(
            self,
            IncidentStatus::AwaitingApproval | IncidentStatus::TestsPassed
        )
    }

    /// Forward-only: strictly later in the main sequence, `test_failed` only
    /// straight out of `testing_patch`, `failed` from any non-terminal state.
    pub fn can_transition_to(&self, next: IncidentStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            IncidentStatus::Failed => true,
            IncidentStatus::TestFailed => *self == IncidentStatus::TestingPatch,
            _ => match (self.phase_index(), next.phase_index()) {
                (Some(current), Some(target)) => target > current,
                _ => false,
            },
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw submission body, loosely typed until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorReportPayload {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub traceback: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorReportPayload {
    pub fn validate(self) -> Result<ErrorReport, ValidationError> {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
        }

        let mut missing = Vec::new();
        if !present(&self.filename) {
            missing.push("filename");
        }
        if !present(&self.error_type) {
            missing.push("error_type");
        }
        if !present(&self.message) {
            missing.push("message");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(ErrorReport {
            filename: self.filename.unwrap_or_default(),
            error_type: self.error_type.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            traceback: self.traceback.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
        })
    }
}

/// A validated error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub filename: String,
    pub error_type: String,
    pub message: String,
    pub traceback: String,
    pub code: String,
}

impl ErrorReport {
    /// First `line <N>` mention in the traceback.
    pub fn line(&self) -> Option<u32> {
        TRACEBACK_LINE
            .captures(&self.traceback)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub error_type: String,
    pub message: String,
    #[serde(default)]
    pub traceback: String,
    #[serde(default)]
    pub code: String,
    pub status: IncidentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Last status held before diverting to `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_from: Option<IncidentStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    pub fn from_report(report: ErrorReport) -> Self {
        let now = Utc::now();
        let line = report.line();
        Self {
            id: IncidentId::new(),
            filename: report.filename,
            line,
            error_type: report.error_type,
            message: report.message,
            traceback: report.traceback,
            code: report.code,
            status: IncidentStatus::Received,
            plan: None,
            patch: None,
            tests_passed: None,
            test_output: None,
            workspace_url: None,
            pr_url: None,
            audio_url: None,
            failed_from: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the incident to `next`, refreshing `updated_at` without ever
    /// letting it go backwards.
    pub fn advance(&mut self, next: IncidentStatus) -> Result<(), WorkflowError> {
        if !self.status.can_transition_to(next) {
            return Err(WorkflowError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        if next == IncidentStatus::Failed {
            self.failed_from = Some(self.status);
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

/// Orders incidents newest-created first.
pub fn sort_newest_first(incidents: &mut [Incident]) {
    incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
