use imgslot_core::constants::OUTPUT_EXTENSION;
use imgslot_core::{GeneratedVariant, ProcessedImage, UploadError, UploadedVariant, VariantTag};
use imgslot_storage::Storage;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use super::progress::ProgressTracker;
use crate::naming::NameResolver;
use crate::validator::extension_for_mime;

type InFlightSet = Arc<Mutex<HashSet<String>>>;

/// Reservation of a name prefix for one upload. Released on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    prefix: String,
    in_flight: InFlightSet,
}

impl InFlightGuard {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.prefix);
    }
}

/// Uploads a generated variant set and assembles the result record.
///
/// Variants go up one at a time, original first. A failure stops the run;
/// variants already stored are left in place and reported back.
#[derive(Clone)]
pub struct UploadCoordinator {
    storage: Arc<dyn Storage>,
    in_flight: InFlightSet,
}

impl UploadCoordinator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn is_in_flight(&self, prefix: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(prefix)
    }

    /// Reserve `prefix`, failing with `InFlight` if an upload already holds it.
    pub fn try_reserve(&self, prefix: &str) -> Result<InFlightGuard, UploadError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(prefix.to_string()) {
            tracing::debug!(prefix = %prefix, "Upload rejected, prefix already in flight");
            return Err(UploadError::InFlight {
                prefix: prefix.to_string(),
            });
        }
        Ok(InFlightGuard {
            prefix: prefix.to_string(),
            in_flight: self.in_flight.clone(),
        })
    }

    /// Reserve `prefix` and upload.
    pub async fn upload<F>(
        &self,
        variants: Vec<GeneratedVariant>,
        prefix: &str,
        on_progress: F,
    ) -> Result<ProcessedImage, UploadError>
    where
        F: Fn(u8) + Send + Sync,
    {
        let guard = self.try_reserve(prefix)?;
        self.upload_reserved(&guard, variants, on_progress).await
    }

    /// Upload under a prefix the caller has already reserved.
    pub async fn upload_reserved<F>(
        &self,
        guard: &InFlightGuard,
        mut variants: Vec<GeneratedVariant>,
        on_progress: F,
    ) -> Result<ProcessedImage, UploadError>
    where
        F: Fn(u8) + Send + Sync,
    {
        let prefix = guard.prefix();
        if !variants.iter().any(|v| v.tag == VariantTag::Original) {
            return Err(UploadError::MissingOriginal);
        }
        variants.sort_by_key(|v| v.tag);

        let start = Instant::now();
        let names = NameResolver::new();
        let tracker = ProgressTracker::new(variants.len(), on_progress);
        tracker.start();

        let mut uploaded: Vec<UploadedVariant> = Vec::with_capacity(variants.len());
        for variant in variants {
            let extension = extension_for_mime(&variant.mime_type).unwrap_or(OUTPUT_EXTENSION);
            let path = names
                .resolve_path(prefix, variant.tag, extension)
                .to_string();
            let byte_size = variant.bytes.len() as u64;

            let result = self
                .storage
                .put_with_progress(&path, variant.bytes, &variant.mime_type, &|sent: u64, total: u64| {
                    tracker.variant_progress(sent, total)
                })
                .await;

            match result {
                Ok(url) => {
                    tracker.variant_done();
                    uploaded.push(UploadedVariant {
                        tag: variant.tag,
                        url,
                        storage_path: path,
                        width: variant.width,
                        height: variant.height,
                        byte_size,
                    });
                }
                Err(e) => {
                    tracker.terminate();
                    let completed_tags: Vec<VariantTag> = uploaded.iter().map(|v| v.tag).collect();
                    tracing::error!(
                        prefix = %prefix,
                        tag = %variant.tag,
                        key = %path,
                        completed = ?completed_tags,
                        error = %e,
                        "Variant upload failed"
                    );
                    return Err(if completed_tags.is_empty() {
                        UploadError::NetworkFailure(e.to_string())
                    } else {
                        UploadError::PartialFailure {
                            completed_tags,
                            message: e.to_string(),
                        }
                    });
                }
            }
        }

        let total_bytes: u64 = uploaded.iter().map(|v| v.byte_size).sum();
        let image = ProcessedImage::from_variants(uploaded).ok_or(UploadError::MissingOriginal)?;
        tracker.finish();

        tracing::info!(
            prefix = %prefix,
            variants = image.variants().len(),
            size_bytes = total_bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "Image variants uploaded"
        );

        Ok(image)
    }
}
