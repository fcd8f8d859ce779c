// incident-store-rs/src/file.rs
// Bucket-style store: one pretty-printed JSON object per incident under
// `<root>/incidents/<id>.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use shared_types_rs::{sort_newest_first, Incident, IncidentId, IncidentStore, StoreError};

const PREFIX: &str = "incidents";

#[derive(Debug)]
pub struct FileIncidentStore {
    dir: PathBuf,
    // serializes temp-file writes within this process
    write_lock: Mutex<()>,
}

impl FileIncidentStore {
    /// Opens the bucket at `root`, creating it if needed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = root.as_ref().join(PREFIX);
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, id: IncidentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn read_record(path: &Path) -> Result<Option<Incident>, StoreError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn record_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

#[async_trait]
impl IncidentStore for FileIncidentStore {
    async fn put(&self, incident: &Incident) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(incident)?;
        let path = self.path_for(incident.id);
        let tmp = path.with_extension("json.tmp");

        let _guard = self.write_lock.lock().await;
        fs::write(&tmp, &body).await?;
        fs::rename(&tmp, &path).await?;
        debug!(incident_id = %incident.id, status = %incident.status, "incident saved");
        Ok(())
    }

    async fn get(&self, id: IncidentId) -> Result<Option<Incident>, StoreError> {
        Self::read_record(&self.path_for(id)).await
    }

    async fn list(&self) -> Result<Vec<Incident>, StoreError> {
        let mut incidents = Vec::new();
        for path in self.record_paths().await? {
            match Self::read_record(&path).await {
                Ok(Some(incident)) => incidents.push(incident),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable incident"),
            }
        }
        sort_newest_first(&mut incidents);
        Ok(incidents)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut removed = 0;
        for path in self.record_paths().await? {
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }
}
