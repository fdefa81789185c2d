//! Path and URL convention shared by all backends.
//!
//! URL format: `{base_url}/images/{path}`. A URL without an `/images/`
//! segment was not produced by this crate.

use imgslot_core::constants::IMAGES_SEGMENT;

use crate::traits::{StorageError, StorageResult};

/// Build the public URL for a storage path.
pub fn public_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        IMAGES_SEGMENT,
        urlencoding::encode(path)
    )
}

/// Recover the storage path from a public URL.
///
/// Returns `None` when the URL does not follow the `/images/<path>`
/// convention, e.g. for a user-pasted external URL.
pub fn storage_path_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);

    let marker = format!("/{}/", IMAGES_SEGMENT);
    let start = without_query.rfind(&marker)? + marker.len();
    let encoded = &without_query[start..];
    if encoded.is_empty() {
        return None;
    }

    let path = urlencoding::decode(encoded).ok()?.into_owned();
    validate_path(&path).ok()?;
    Some(path)
}

/// Reject paths that could escape the bucket.
pub fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::InvalidKey("empty path".to_string()));
    }
    if path.contains("..") || path.starts_with('/') || path.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage path contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
