use async_trait::async_trait;
use bytes::Bytes;
use imgslot_storage::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, Semaphore};

use super::BASE_URL;

/// Holds every put until the test opens the gate.
pub struct GatedStorage {
    pub inner: MemoryStorage,
    gate: Semaphore,
    entered: Notify,
    waiting: AtomicUsize,
}

impl GatedStorage {
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(BASE_URL),
            gate: Semaphore::new(0),
            entered: Notify::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Resolves once a put has reached the gate.
    pub async fn wait_for_put(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        self.gate.add_permits(1024);
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for GatedStorage {
    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        permit.forget();
        self.inner.put(path, data, content_type).await
    }

    async fn remove(&self, path: &str) -> StorageResult<()> {
        self.inner.remove(path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path).await
    }

    fn public_url(&self, path: &str) -> String {
        self.inner.public_url(path)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Succeeds for the first `put_budget` puts, then fails. Removes can be
/// made to fail too.
pub struct FailingStorage {
    pub inner: MemoryStorage,
    put_budget: usize,
    fail_removes: bool,
    puts: AtomicUsize,
}

impl FailingStorage {
    pub fn new(put_budget: usize, fail_removes: bool) -> Self {
        Self {
            inner: MemoryStorage::new(BASE_URL),
            put_budget,
            fail_removes,
            puts: AtomicUsize::new(0),
        }
    }

    pub fn put_attempts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        if self.puts.fetch_add(1, Ordering::SeqCst) >= self.put_budget {
            return Err(StorageError::UploadFailed("connection reset by peer".to_string()));
        }
        self.inner.put(path, data, content_type).await
    }

    async fn remove(&self, path: &str) -> StorageResult<()> {
        if self.fail_removes {
            return Err(StorageError::DeleteFailed(format!("{}: access denied", path)));
        }
        self.inner.remove(path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path).await
    }

    fn public_url(&self, path: &str) -> String {
        self.inner.public_url(path)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
