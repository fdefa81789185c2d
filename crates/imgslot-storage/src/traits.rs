//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte-level progress callback: `(bytes_sent, bytes_total)`.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Storage abstraction trait
///
/// The pipeline treats the bucket as an opaque object store: it puts bytes
/// under a path, gets back a public URL, and later removes the path.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `path` and return its public URL.
    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> StorageResult<String>;

    /// Store `data` under `path`, reporting byte progress along the way.
    ///
    /// Backends that cannot observe partial progress report completion once
    /// the write has finished.
    async fn put_with_progress(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
        progress: ProgressFn<'_>,
    ) -> StorageResult<String> {
        let total = data.len() as u64;
        let url = self.put(path, data, content_type).await?;
        progress(total, total);
        Ok(url)
    }

    /// Remove the object at `path`. Removing a missing object succeeds.
    async fn remove(&self, path: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Public URL an object at `path` is (or would be) served from.
    fn public_url(&self, path: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
