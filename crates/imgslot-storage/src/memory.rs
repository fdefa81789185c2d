use crate::keys::{public_url, validate_path};
use crate::traits::{Storage, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-process bucket.
///
/// Useful for previews and tests; objects vanish with the process.
pub struct MemoryStorage {
    base_url: String,
    objects: RwLock<BTreeMap<String, StoredObject>>,
    put_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(BTreeMap::new()),
            put_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Number of `put` calls received, successful or not.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of `remove` calls received, successful or not.
    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        validate_path(path)?;

        let size = data.len();
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        tracing::debug!(key = %path, size_bytes = size, "Memory storage upload successful");
        Ok(self.public_url(path))
    }

    async fn remove(&self, path: &str) -> StorageResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        validate_path(path)?;

        if self.objects.write().await.remove(path).is_some() {
            tracing::debug!(key = %path, "Memory storage delete successful");
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        validate_path(path)?;
        Ok(self.objects.read().await.contains_key(path))
    }

    fn public_url(&self, path: &str) -> String {
        public_url(&self.base_url, path)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
