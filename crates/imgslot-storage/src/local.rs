use crate::keys::{public_url, validate_path};
use crate::traits::{ProgressFn, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

const WRITE_CHUNK_BYTES: usize = 64 * 1024;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory of the bucket (e.g., "/var/lib/imgslot")
    /// * `base_url` - Base URL the bucket is served from (e.g., "http://localhost:3000/storage")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage path to a filesystem path inside the bucket
    ///
    /// The deepest existing ancestor is canonicalized, so a symlink inside the
    /// bucket cannot point a write or delete outside it.
    fn key_to_path(&self, storage_path: &str) -> StorageResult<PathBuf> {
        validate_path(storage_path)?;

        let path = self.base_path.join(storage_path);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;
        let existing = path
            .ancestors()
            .find(|ancestor| ancestor.exists())
            .unwrap_or(self.base_path.as_path());
        let resolved = existing.canonicalize().map_err(|e| {
            StorageError::InvalidKey(format!("Failed to resolve storage path: {}", e))
        })?;

        if resolved.strip_prefix(&base_canonical).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage path resolves outside storage directory".to_string(),
            ));
        }
        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_chunked(
        &self,
        storage_path: &str,
        data: &Bytes,
        progress: ProgressFn<'_>,
    ) -> StorageResult<PathBuf> {
        let path = self.key_to_path(storage_path)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        write_or_discard(&path, &mut file, data, progress).await?;

        if let Err(e) = file.sync_all().await {
            discard_partial(&path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                path.display(),
                e
            )));
        }

        if data.is_empty() {
            progress(0, 0);
        }
        Ok(path)
    }
}

/// Write `data` in chunks, reporting progress after each one. A failed write
/// removes the file at `path` so no truncated object is left in the bucket.
async fn write_or_discard<W>(
    path: &Path,
    writer: &mut W,
    data: &Bytes,
    progress: ProgressFn<'_>,
) -> StorageResult<()>
where
    W: AsyncWrite + Unpin,
{
    let total = data.len() as u64;
    let mut written = 0u64;
    for chunk in data.chunks(WRITE_CHUNK_BYTES) {
        if let Err(e) = writer.write_all(chunk).await {
            discard_partial(path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }
        written += chunk.len() as u64;
        progress(written, total);
    }

    if let Err(e) = writer.flush().await {
        discard_partial(path).await;
        return Err(StorageError::UploadFailed(format!(
            "Failed to flush file {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

async fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial file");
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, storage_path: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        self.put_with_progress(storage_path, data, content_type, &|_, _| {})
            .await
    }

    async fn put_with_progress(
        &self,
        storage_path: &str,
        data: Bytes,
        _content_type: &str,
        progress: ProgressFn<'_>,
    ) -> StorageResult<String> {
        let start = std::time::Instant::now();
        let path = self.write_chunked(storage_path, &data, progress).await?;
        let url = self.public_url(storage_path);

        tracing::info!(
            path = %path.display(),
            key = %storage_path,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn remove(&self, storage_path: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_path)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_path)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn public_url(&self, storage_path: &str) -> String {
        public_url(&self.base_url, storage_path)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
