// incident-store-rs/src/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_types_rs::{sort_newest_first, Incident, IncidentId, IncidentStore, StoreError};

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryIncidentStore {
    incidents: RwLock<HashMap<IncidentId, Incident>>,
}

impl MemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncidentStore for MemoryIncidentStore {
    async fn put(&self, incident: &Incident) -> Result<(), StoreError> {
        self.incidents
            .write()
            .await
            .insert(incident.id, incident.clone());
        Ok(())
    }

    async fn get(&self, id: IncidentId) -> Result<Option<Incident>, StoreError> {
        Ok(self.incidents.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Incident>, StoreError> {
        let mut all: Vec<Incident> = self.incidents.read().await.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let mut incidents = self.incidents.write().await;
        let removed = incidents.len();
        incidents.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types_rs::{ErrorReport, IncidentStatus};

    fn incident() -> Incident {
        Incident::from_report(ErrorReport {
            filename: "a.py".into(),
            error_type: "KeyError".into(),
            message: "'x'".into(),
            traceback: String::new(),
            code: String::new(),
        })
    }

    #[tokio::test]
    async fn put_replaces_whole_record() {
        let store = MemoryIncidentStore::new();
        let mut record = incident();
        store.put(&record).await.unwrap();

        record.plan = Some("plan".into());
        record.advance(IncidentStatus::Planned).unwrap();
        store.put(&record).await.unwrap();

        let stored = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = MemoryIncidentStore::new();
        assert!(store.get(IncidentId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_then_list_is_empty() {
        let store = MemoryIncidentStore::new();
        store.put(&incident()).await.unwrap();
        store.put(&incident()).await.unwrap();
        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.list().await.unwrap().is_empty());
    }
}
