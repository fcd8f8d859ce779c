
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use incident_store_rs::MemoryIncidentStore;
use shared_types_rs::{
    ErrorReportPayload, Incident, IncidentId, IncidentStatus, IncidentStore, StoreError,
};

pub(crate) fn payload(error_type: &str) -> ErrorReportPayload {
    ErrorReportPayload {
        filename: Some("a.py".into()),
        error_type: Some(error_type.into()),
        message: Some("'x'".into()),
        traceback: Some("File \"a.py\", line 2, in checkout".into()),
        code: Some("def checkout(order):\n    return order['x']".into()),
    }
}

/// Memory store that keeps a copy of every record handed to `put`. With a
/// hold set, a `put` of that status is stored, then waits for `release`.
#[derive(Default)]
pub(crate) struct RecordingStore {
    inner: MemoryIncidentStore,
    snapshots: Mutex<Vec<Incident>>,
    hold: Option<(IncidentStatus, Arc<Notify>)>,
}

impl RecordingStore {
    pub(crate) fn holding(status: IncidentStatus) -> Self {
        Self {
            hold: Some((status, Arc::new(Notify::new()))),
            ..Self::default()
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<Incident> {
        self.snapshots.lock().unwrap().clone()
    }

    pub(crate) fn release(&self) {
        if let Some((_, gate)) = &self.hold {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl IncidentStore for RecordingStore {
    async fn put(&self, incident: &Incident) -> Result<(), StoreError> {
        self.inner.put(incident).await?;
        self.snapshots.lock().unwrap().push(incident.clone());
        if let Some((status, gate)) = &self.hold {
            if incident.status == *status {
                gate.notified().await;
            }
        }
        Ok(())
    }

    async fn get(&self, id: IncidentId) -> Result<Option<Incident>, StoreError> {
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<Incident>, StoreError> {
        self.inner.list().await
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        self.inner.clear().await
    }
}
