//! incident-store-rs
//! Persistence for incident records. Records are always written whole.

mod file;
mod memory;

use std::sync::Arc;

use config_rs::{StoreBackend, StoreConfig};
use shared_types_rs::{IncidentStore, StoreError};

pub use file::FileIncidentStore;
pub use memory::MemoryIncidentStore;

/// Opens the backend selected in configuration.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn IncidentStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory incident store");
            Ok(Arc::new(MemoryIncidentStore::new()))
        }
        StoreBackend::File => {
            let store = FileIncidentStore::open(&config.dir).await?;
            tracing::info!(dir = %config.dir.display(), "using file incident store");
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_configured_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::File,
            dir: dir.path().join("bucket"),
        };
        let store = open_store(&config).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(dir.path().join("bucket").join("incidents").is_dir());
    }
}
