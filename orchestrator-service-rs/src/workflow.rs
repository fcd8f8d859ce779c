// orchestrator-service-rs/src/workflow.rs
// The incident workflow. Every status change is persisted before the next
// collaborator is called, so a reader of the store never sees a status
// older than the last finished phase.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use shared_types_rs::{
    ErrorReportPayload, Incident, IncidentId, IncidentStatus, Result, WorkflowError,
};

use crate::collaborators::{CollaboratorModes, Collaborators};

#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    collaborators: Collaborators,
    /// Incidents inside `complete_manually`, or being parked for approval.
    claims: Mutex<HashSet<IncidentId>>,
}

/// Releases a claim when dropped, on success or error alike.
struct ClaimGuard<'a> {
    claims: &'a Mutex<HashSet<IncidentId>>,
    id: IncidentId,
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut claims) = self.claims.lock() {
            claims.remove(&self.id);
        }
    }
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            inner: Arc::new(Inner {
                collaborators,
                claims: Mutex::new(HashSet::new()),
            }),
        }
    }

    pub fn modes(&self) -> CollaboratorModes {
        self.inner.collaborators.modes()
    }

    fn collaborators(&self) -> &Collaborators {
        &self.inner.collaborators
    }

    async fn advance(&self, incident: &mut Incident, next: IncidentStatus) -> Result<()> {
        incident.advance(next)?;
        self.collaborators().store.put(incident).await?;
        info!(incident_id = %incident.id, status = %incident.status, "incident advanced");
        Ok(())
    }

    /// Diverts to `failed`. Persisting that is best effort: the original
    /// error is what the caller needs to see.
    async fn mark_failed(&self, incident: &mut Incident) {
        if let Err(e) = incident.advance(IncidentStatus::Failed) {
            warn!(incident_id = %incident.id, error = %e, "cannot mark incident failed");
            return;
        }
        match self.collaborators().store.put(incident).await {
            Ok(()) => error!(
                incident_id = %incident.id,
                failed_from = ?incident.failed_from,
                "incident failed"
            ),
            Err(e) => error!(incident_id = %incident.id, error = %e, "failed to persist failed status"),
        }
    }

    /// Creates the incident and runs the synchronous phases (log, plan,
    /// patch). The sandbox phase continues in the background; the id is
    /// returned as soon as the patch is persisted.
    pub async fn start_workflow(&self, payload: ErrorReportPayload) -> Result<IncidentId> {
        let (id, _) = self.start_workflow_detached(payload).await?;
        Ok(id)
    }

    /// Like [`Orchestrator::start_workflow`], but hands back the background
    /// task so callers that care can wait for it.
    pub async fn start_workflow_detached(
        &self,
        payload: ErrorReportPayload,
    ) -> Result<(IncidentId, JoinHandle<()>)> {
        let report = payload.validate()?;
        let mut incident = Incident::from_report(report);
        let id = incident.id;
        info!(incident_id = %id, error_type = %incident.error_type, filename = %incident.filename, "error report received");

        if let Err(e) = self.collaborators().store.put(&incident).await {
            error!(incident_id = %id, error = %e, "failed to persist new incident");
            self.mark_failed(&mut incident).await;
            return Err(e.into());
        }

        if let Err(e) = self.run_creation_phases(&mut incident).await {
            error!(incident_id = %id, error = %e, "incident creation failed");
            self.mark_failed(&mut incident).await;
            return Err(e);
        }

        let this = self.clone();
        let handle = tokio::spawn(async move {
            this.run_sandbox_phase(incident).await;
        });
        Ok((id, handle))
    }

    async fn run_creation_phases(&self, incident: &mut Incident) -> Result<()> {
        self.collaborators().log_sink.log(incident).await?;
        self.advance(incident, IncidentStatus::Logged).await?;

        let plan = self.collaborators().planner.plan(incident).await?;
        incident.plan = Some(plan.clone());
        self.advance(incident, IncidentStatus::Planned).await?;

        let patch = self.collaborators().planner.patch(incident, &plan).await?;
        incident.patch = Some(patch);
        self.advance(incident, IncidentStatus::PatchProposed).await?;
        Ok(())
    }

    /// Sandbox and test phases. Nobody awaits this, so errors end in
    /// `failed` instead of being returned.
    pub async fn run_sandbox_phase(&self, mut incident: Incident) {
        if let Err(e) = self.sandbox_and_test(&mut incident).await {
            error!(incident_id = %incident.id, error = %e, "sandbox phase failed");
            self.mark_failed(&mut incident).await;
        }
    }

    async fn sandbox_and_test(&self, incident: &mut Incident) -> Result<()> {
        let workspace_url = self.collaborators().sandbox.start_sandbox(incident).await?;
        incident.workspace_url = Some(workspace_url);
        self.advance(incident, IncidentStatus::SandboxStarted).await?;

        self.advance(incident, IncidentStatus::TestingPatch).await?;
        let outcome = self.collaborators().sandbox.test_patch(incident).await?;
        incident.tests_passed = Some(outcome.success);
        incident.test_output = Some(outcome.output);

        if !outcome.success {
            // Parked; nothing retries a failed test.
            self.advance(incident, IncidentStatus::TestFailed).await?;
            return Ok(());
        }

        self.advance(incident, IncidentStatus::TestedOk).await?;
        self.advance(incident, IncidentStatus::TestsPassed).await?;
        self.park_for_approval(incident).await
    }

    /// Completion is already allowed from `tests_passed`, so this is the one
    /// background write that can race it. It takes the same claim and only
    /// lands while the stored record is still at `tests_passed`.
    async fn park_for_approval(&self, incident: &mut Incident) -> Result<()> {
        let Ok(_claim) = self.claim(incident.id, incident.status) else {
            info!(incident_id = %incident.id, "completion under way, not parking for approval");
            return Ok(());
        };
        let stored = self.collaborators().store.get(incident.id).await?;
        if stored.map(|s| s.status) != Some(IncidentStatus::TestsPassed) {
            info!(incident_id = %incident.id, "incident moved on, not parking for approval");
            return Ok(());
        }
        self.advance(incident, IncidentStatus::AwaitingApproval).await
    }

    fn claim(&self, id: IncidentId, status: IncidentStatus) -> Result<ClaimGuard<'_>> {
        let mut claims = self
            .inner
            .claims
            .lock()
            .map_err(|_| WorkflowError::InvalidState { id, status })?;
        if !claims.insert(id) {
            return Err(WorkflowError::InvalidState { id, status });
        }
        Ok(ClaimGuard {
            claims: &self.inner.claims,
            id,
        })
    }

    /// Approves a tested incident: opens the pull request, synthesizes the
    /// voice summary, and completes. Neither side effect can fail the call.
    pub async fn complete_manually(&self, id: &str) -> Result<Incident> {
        let mut incident = self.get_incident(id).await?;
        let _claim = self.claim(incident.id, incident.status)?;

        // Re-read under the claim; another completion may have just finished.
        incident = self.get_incident(id).await?;
        if !incident.status.is_completable() {
            return Err(WorkflowError::InvalidState {
                id: incident.id,
                status: incident.status,
            });
        }
        info!(incident_id = %incident.id, "manual completion started");

        match self.collaborators().pull_requests.open_pull_request(&incident).await {
            Ok(url) => {
                incident.pr_url = Some(url);
                self.advance(&mut incident, IncidentStatus::PrCreated).await?;
            }
            Err(e) => warn!(incident_id = %incident.id, error = %e, "pull request not opened, continuing"),
        }

        match self.collaborators().voice.synthesize(&incident).await {
            Ok(reference) => incident.audio_url = Some(reference),
            Err(e) => warn!(incident_id = %incident.id, error = %e, "voice summary not produced, continuing"),
        }

        self.advance(&mut incident, IncidentStatus::Completed).await?;
        Ok(incident)
    }

    pub async fn get_incident(&self, id: &str) -> Result<Incident> {
        let parsed = IncidentId::parse(id).ok_or_else(|| WorkflowError::NotFound(id.to_string()))?;
        self.collaborators()
            .store
            .get(parsed)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(id.to_string()))
    }

    /// Newest first. A failing store reads as empty.
    pub async fn list_incidents(&self) -> Vec<Incident> {
        match self.collaborators().store.list().await {
            Ok(incidents) => incidents,
            Err(e) => {
                error!(error = %e, "failed to list incidents");
                Vec::new()
            }
        }
    }

    /// Administrative bulk delete; returns how many records were removed.
    pub async fn clear(&self) -> Result<usize> {
        let removed = self.collaborators().store.clear().await?;
        warn!(removed, "all incidents cleared");
        Ok(removed)
    }
}
