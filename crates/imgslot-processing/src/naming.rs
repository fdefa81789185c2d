//! Storage path naming.
//!
//! Format: `{prefix}-{tag}-{suffix}.{ext}`. All variants written by one
//! upload share a suffix, so any one path identifies its siblings. The suffix
//! is a hex millisecond timestamp followed by random hex, so a retry never
//! lands on the name of an earlier attempt.

use chrono::Utc;
use imgslot_core::VariantTag;
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    pub prefix: String,
    pub tag: VariantTag,
    pub suffix: String,
    pub extension: String,
}

impl StoragePath {
    /// Parse a path produced by [`NameResolver`]. Returns `None` for any other name.
    pub fn parse(path: &str) -> Option<Self> {
        let (stem, extension) = path.rsplit_once('.')?;
        let (rest, suffix) = stem.rsplit_once('-')?;
        let (prefix, tag) = rest.rsplit_once('-')?;

        if prefix.is_empty()
            || extension.is_empty()
            || suffix.is_empty()
            || !suffix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return None;
        }

        Some(Self {
            prefix: prefix.to_string(),
            tag: tag.parse().ok()?,
            suffix: suffix.to_string(),
            extension: extension.to_string(),
        })
    }

    /// Path of the variant `tag` written by the same upload.
    pub fn sibling(&self, tag: VariantTag, extension: &str) -> Self {
        Self {
            prefix: self.prefix.clone(),
            tag,
            suffix: self.suffix.clone(),
            extension: normalize_extension(extension),
        }
    }
}

impl Display for StoragePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}-{}-{}.{}",
            self.prefix, self.tag, self.suffix, self.extension
        )
    }
}

/// Names the variants of one upload.
#[derive(Debug, Clone)]
pub struct NameResolver {
    suffix: String,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver {
    /// A resolver with a fresh suffix. Use one per upload.
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let random = Uuid::new_v4().simple().to_string();
        Self {
            suffix: format!("{:x}{}", millis, &random[..12]),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn resolve_path(
        &self,
        prefix: &str,
        tag: VariantTag,
        source_extension: &str,
    ) -> StoragePath {
        StoragePath {
            prefix: prefix.to_string(),
            tag,
            suffix: self.suffix.clone(),
            extension: normalize_extension(source_extension),
        }
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
