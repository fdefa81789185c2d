use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::variant::VariantTag;

/// User-supplied image bytes with their declared MIME type.
///
/// Lives only until variants have been generated from it.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub bytes: Bytes,
    pub mime_type: String,
    pub filename: Option<String>,
}

impl RawInput {
    /// The MIME type is lowercased and stripped of parameters
    /// (`image/svg+xml; charset=utf-8` becomes `image/svg+xml`).
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        Self {
            bytes: bytes.into(),
            mime_type: essence(&mime_type).to_lowercase(),
            filename: None,
        }
    }

    /// Declared type without parameters, for inputs built field by field.
    pub fn media_type(&self) -> &str {
        essence(&self.mime_type)
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}

fn essence(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or_default().trim()
}

/// A derived image, owned by the generation call until handed to upload.
#[derive(Debug, Clone)]
pub struct GeneratedVariant {
    pub tag: VariantTag,
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

/// A variant that has been durably stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedVariant {
    pub tag: VariantTag,
    pub url: String,
    pub storage_path: String,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
}

/// Result of a successful pipeline run.
///
/// Always holds an original variant, and `original_url` is always that
/// variant's URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProcessedImageRepr")]
pub struct ProcessedImage {
    original_url: String,
    variants: BTreeMap<VariantTag, UploadedVariant>,
}

#[derive(Deserialize)]
struct ProcessedImageRepr {
    #[serde(default)]
    original_url: Option<String>,
    variants: BTreeMap<VariantTag, UploadedVariant>,
}

impl TryFrom<ProcessedImageRepr> for ProcessedImage {
    type Error = String;

    fn try_from(repr: ProcessedImageRepr) -> Result<Self, Self::Error> {
        let image = ProcessedImage::from_variants(repr.variants.into_values())
            .ok_or_else(|| "variants must contain an original entry".to_string())?;
        match repr.original_url {
            Some(url) if url != image.original_url => Err(format!(
                "original_url {} does not match the original variant",
                url
            )),
            _ => Ok(image),
        }
    }
}

impl ProcessedImage {
    /// Build from uploaded variants. Returns `None` without an original.
    ///
    /// A later variant with the same tag replaces an earlier one.
    pub fn from_variants(variants: impl IntoIterator<Item = UploadedVariant>) -> Option<Self> {
        let variants: BTreeMap<VariantTag, UploadedVariant> =
            variants.into_iter().map(|v| (v.tag, v)).collect();
        let original_url = variants.get(&VariantTag::Original)?.url.clone();
        Some(Self {
            original_url,
            variants,
        })
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn original(&self) -> &UploadedVariant {
        // from_variants guarantees the entry
        &self.variants[&VariantTag::Original]
    }

    pub fn variant(&self, tag: VariantTag) -> Option<&UploadedVariant> {
        self.variants.get(&tag)
    }

    pub fn variants(&self) -> &BTreeMap<VariantTag, UploadedVariant> {
        &self.variants
    }

    pub fn storage_paths(&self) -> impl Iterator<Item = &str> {
        self.variants.values().map(|v| v.storage_path.as_str())
    }

    pub fn total_bytes(&self) -> u64 {
        self.variants.values().map(|v| v.byte_size).sum()
    }
}

/// The value held by a field: either a pipeline result or a pasted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldValue {
    Processed(ProcessedImage),
    External { url: String },
}

impl FieldValue {
    pub fn url(&self) -> &str {
        match self {
            FieldValue::Processed(image) => image.original_url(),
            FieldValue::External { url } => url,
        }
    }

    /// Variant metadata, absent for pasted URLs.
    pub fn image_data(&self) -> Option<&ProcessedImage> {
        match self {
            FieldValue::Processed(image) => Some(image),
            FieldValue::External { .. } => None,
        }
    }
}
