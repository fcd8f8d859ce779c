// shared-types-rs/src/timeline.rs
// Per-phase progress view derived from an incident's current status

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::incident::{Incident, IncidentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Running,
    Failed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub phase: IncidentStatus,
    pub step: &'static str,
    pub status: StepState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn label(phase: IncidentStatus) -> &'static str {
    match phase {
        IncidentStatus::Received => "Error received and incident created",
        IncidentStatus::Logged => "Logged to observability sink",
        IncidentStatus::Planned => "Error analyzed and fix plan created",
        IncidentStatus::PatchProposed => "Patch generated",
        IncidentStatus::SandboxStarted => "Sandbox workspace created",
        IncidentStatus::TestingPatch => "Testing patch in isolated environment",
        IncidentStatus::TestedOk => "Patch tested successfully",
        IncidentStatus::TestsPassed => "All tests passed",
        IncidentStatus::AwaitingApproval => "Waiting for manual approval",
        IncidentStatus::PrCreated => "Pull request created for review",
        IncidentStatus::Completed => "Voice summary generated, workflow complete",
        IncidentStatus::TestFailed => "Patch failed tests",
        IncidentStatus::Failed => "Workflow failed",
    }
}

/// Builds one entry per main-sequence phase. Phases before the current one
/// are completed, the current one is running, later ones pending. For the
/// failure exits the phase the incident was attempting is marked failed.
pub fn derive_timeline(incident: &Incident) -> Vec<TimelineEntry> {
    let (current, current_state) = match incident.status {
        IncidentStatus::TestFailed => (
            IncidentStatus::TestedOk.phase_index().unwrap_or(0),
            StepState::Failed,
        ),
        IncidentStatus::Failed => {
            let attempted = incident
                .failed_from
                .and_then(|from| from.phase_index())
                .map(|idx| (idx + 1).min(IncidentStatus::PHASES.len() - 1))
                .unwrap_or(0);
            (attempted, StepState::Failed)
        }
        status => (status.phase_index().unwrap_or(0), StepState::Running),
    };

    IncidentStatus::PHASES
        .iter()
        .enumerate()
        .map(|(idx, phase)| {
            let status = if idx < current {
                StepState::Completed
            } else if idx == current {
                current_state
            } else {
                StepState::Pending
            };
            TimelineEntry {
                phase: *phase,
                step: label(*phase),
                status,
                timestamp: (status == StepState::Completed).then_some(incident.updated_at),
            }
        })
        .collect()
}
