use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::image::ProcessedImage;

/// Asset metadata row shape.
///
/// The pipeline emits this record; persisting it belongs to the calling form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub filename: String,
    pub alt_text: String,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
    /// Variant map keyed by tag, as stored in the JSON column.
    pub variants: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssetMetadata {
    /// Describe a processed image. Dimensions and size come from the original variant.
    pub fn from_processed(
        image: &ProcessedImage,
        filename: impl Into<String>,
        alt_text: impl Into<String>,
        created_by: Option<Uuid>,
    ) -> Result<Self, serde_json::Error> {
        let original = image.original();
        let now = Utc::now();
        Ok(Self {
            filename: filename.into(),
            alt_text: alt_text.into().trim().to_string(),
            width: original.width,
            height: original.height,
            byte_size: original.byte_size,
            variants: serde_json::to_value(image.variants())?,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }
}
