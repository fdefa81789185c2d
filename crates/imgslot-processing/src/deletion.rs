//! Deletion of stored variants by public URL.

use imgslot_core::constants::OUTPUT_EXTENSION;
use imgslot_core::{DeletionError, ProcessedImage, VariantTag};
use imgslot_storage::{storage_path_from_url, Storage};
use std::sync::Arc;

use crate::naming::StoragePath;

#[derive(Clone)]
pub struct DeletionResolver {
    storage: Arc<dyn Storage>,
    variants: Vec<VariantTag>,
}

impl DeletionResolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_variants(storage, VariantTag::ALL.to_vec())
    }

    /// Resolver that derives siblings for the given tags only.
    pub fn with_variants(storage: Arc<dyn Storage>, variants: Vec<VariantTag>) -> Self {
        Self { storage, variants }
    }

    /// Storage paths belonging to the asset behind `url`.
    ///
    /// Empty for URLs this storage did not issue, including pasted external
    /// URLs that happen to contain an `/images/` segment.
    pub fn resolve_paths(&self, url: &str) -> Vec<String> {
        let owned_prefix = self.storage.public_url("");
        if !url.starts_with(&owned_prefix) {
            return Vec::new();
        }
        let Some(path) = storage_path_from_url(url) else {
            return Vec::new();
        };

        let mut paths = vec![path.clone()];
        // Only generated assets have siblings; pass-through files stand alone.
        let parsed = StoragePath::parse(&path).filter(|p| p.extension == OUTPUT_EXTENSION);
        if let Some(parsed) = parsed {
            for tag in &self.variants {
                let sibling = parsed.sibling(*tag, OUTPUT_EXTENSION).to_string();
                if !paths.contains(&sibling) {
                    paths.push(sibling);
                }
            }
        }
        paths
    }

    /// Remove every variant of the asset behind `url`.
    ///
    /// A URL that does not resolve is a no-op. Every path is attempted even
    /// after a failure.
    pub async fn resolve_and_delete(&self, url: &str) -> Result<(), DeletionError> {
        let paths = self.resolve_paths(url);
        if paths.is_empty() {
            tracing::debug!(url = %url, "URL not issued by this storage, nothing to delete");
            return Ok(());
        }
        self.remove_all(&paths).await
    }

    /// Remove exactly the variants recorded in `image`.
    pub async fn delete_processed(&self, image: &ProcessedImage) -> Result<(), DeletionError> {
        let paths: Vec<String> = image.storage_paths().map(str::to_string).collect();
        self.remove_all(&paths).await
    }

    async fn remove_all(&self, paths: &[String]) -> Result<(), DeletionError> {
        let mut failures = Vec::new();
        for path in paths {
            match self.storage.remove(path).await {
                Ok(()) => tracing::debug!(key = %path, "Removed variant"),
                Err(e) => {
                    tracing::warn!(key = %path, error = %e, "Failed to remove variant");
                    failures.push(DeletionError::Storage {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        match failures.len() {
            0 => {
                tracing::info!(objects = paths.len(), "Image variants removed");
                Ok(())
            }
            1 => Err(failures.remove(0)),
            failed => Err(DeletionError::Incomplete {
                attempted: paths.len(),
                failed,
            }),
        }
    }
}
