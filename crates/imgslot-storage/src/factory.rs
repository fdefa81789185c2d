#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-memory")]
use crate::MemoryStorage;
use crate::{Storage, StorageBackend, StorageResult};
#[cfg(not(all(feature = "storage-local", feature = "storage-memory")))]
use crate::StorageError;
use imgslot_core::PipelineSettings;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(settings: &PipelineSettings) -> StorageResult<Arc<dyn Storage>> {
    match settings.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(
                settings.local_storage_path.clone(),
                settings.public_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new(
            settings.public_base_url.clone(),
        ))),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),
    }
}
