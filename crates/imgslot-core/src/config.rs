//! Configuration module
//!
//! `PipelineSettings` is the process-wide configuration loaded from the
//! environment. `FieldConfig` is the immutable per-field configuration handed
//! to a pipeline controller at construction time.

use std::env;

use crate::constants::{
    ALLOWED_CONTENT_TYPES, DEFAULT_WEBP_QUALITY, MAX_FILE_SIZE_BYTES, THUMBNAIL_PREFIX_SUFFIX,
};
use crate::models::{VariantSpec, VariantTag, DEFAULT_VARIANTS};
use crate::storage_types::StorageBackend;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid name prefix '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidPrefix(String),

    #[error("Invalid aspect ratio {width}:{height}")]
    InvalidAspectRatio { width: u32, height: u32 },

    #[error("Invalid variant table: {0}")]
    InvalidVariants(String),

    #[error("Invalid setting {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },
}

/// Process-wide pipeline settings
#[derive(Clone, Debug)]
pub struct PipelineSettings {
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub webp_quality: f32,
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub public_base_url: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            allowed_content_types: ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            webp_quality: DEFAULT_WEBP_QUALITY,
            storage_backend: StorageBackend::Local,
            local_storage_path: "./data/images-bucket".to_string(),
            public_base_url: "http://localhost:3000/storage".to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let max_file_size_bytes = match env::var("IMGSLOT_MAX_FILE_SIZE_MB") {
            Ok(raw) => parse_size_mb("IMGSLOT_MAX_FILE_SIZE_MB", &raw)?,
            Err(_) => defaults.max_file_size_bytes,
        };

        let allowed_content_types = env::var("IMGSLOT_ALLOWED_CONTENT_TYPES")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_content_types);

        let webp_quality = match env::var("IMGSLOT_WEBP_QUALITY") {
            Ok(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::InvalidSetting {
                    name: "IMGSLOT_WEBP_QUALITY",
                    message: format!("'{}' is not a number", raw),
                })?,
            Err(_) => defaults.webp_quality,
        };

        let storage_backend = match env::var("IMGSLOT_STORAGE_BACKEND") {
            Ok(raw) => raw
                .parse::<StorageBackend>()
                .map_err(|e| ConfigError::InvalidSetting {
                    name: "IMGSLOT_STORAGE_BACKEND",
                    message: e.to_string(),
                })?,
            Err(_) => defaults.storage_backend,
        };

        let settings = Self {
            max_file_size_bytes,
            allowed_content_types,
            webp_quality,
            storage_backend,
            local_storage_path: env::var("IMGSLOT_LOCAL_STORAGE_PATH")
                .unwrap_or(defaults.local_storage_path),
            public_base_url: env::var("IMGSLOT_PUBLIC_BASE_URL")
                .unwrap_or(defaults.public_base_url),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size_bytes == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "max_file_size_bytes",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.allowed_content_types.is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "allowed_content_types",
                message: "at least one content type is required".to_string(),
            });
        }
        if !(1.0..=100.0).contains(&self.webp_quality) {
            return Err(ConfigError::InvalidSetting {
                name: "webp_quality",
                message: format!("{} is outside 1-100", self.webp_quality),
            });
        }
        if self.public_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "public_base_url",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Presentation box for the field preview, as width:height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidAspectRatio { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn as_f32(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Per-field configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    required: bool,
    aspect_ratio: Option<AspectRatio>,
    allow_url_paste: bool,
    name_prefix: String,
    offer_thumbnail: bool,
    variants: Vec<VariantSpec>,
}

impl FieldConfig {
    pub fn builder(name_prefix: impl Into<String>) -> FieldConfigBuilder {
        FieldConfigBuilder {
            required: false,
            aspect_ratio: None,
            allow_url_paste: false,
            name_prefix: name_prefix.into(),
            offer_thumbnail: false,
            variants: DEFAULT_VARIANTS.to_vec(),
        }
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    pub fn allow_url_paste(&self) -> bool {
        self.allow_url_paste
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn offer_thumbnail(&self) -> bool {
        self.offer_thumbnail
    }

    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    /// Configuration for the nested thumbnail slot.
    ///
    /// The nested slot never offers a thumbnail of its own, which bounds
    /// nesting to one level.
    pub fn thumbnail_config(&self) -> FieldConfig {
        FieldConfig {
            required: false,
            aspect_ratio: self.aspect_ratio,
            allow_url_paste: self.allow_url_paste,
            name_prefix: format!("{}{}", self.name_prefix, THUMBNAIL_PREFIX_SUFFIX),
            offer_thumbnail: false,
            variants: self.variants.clone(),
        }
    }
}

pub struct FieldConfigBuilder {
    required: bool,
    aspect_ratio: Option<AspectRatio>,
    allow_url_paste: bool,
    name_prefix: String,
    offer_thumbnail: bool,
    variants: Vec<VariantSpec>,
}

impl FieldConfigBuilder {
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    pub fn allow_url_paste(mut self, allow: bool) -> Self {
        self.allow_url_paste = allow;
        self
    }

    pub fn offer_thumbnail(mut self, offer: bool) -> Self {
        self.offer_thumbnail = offer;
        self
    }

    pub fn variants(mut self, variants: Vec<VariantSpec>) -> Self {
        self.variants = variants;
        self
    }

    pub fn build(self) -> Result<FieldConfig, ConfigError> {
        let name_prefix = self.name_prefix.trim().to_lowercase();
        let valid_chars = name_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if name_prefix.is_empty()
            || !valid_chars
            || name_prefix.starts_with('-')
            || name_prefix.ends_with('-')
        {
            return Err(ConfigError::InvalidPrefix(self.name_prefix));
        }

        validate_variants(&self.variants)?;

        Ok(FieldConfig {
            required: self.required,
            aspect_ratio: self.aspect_ratio,
            allow_url_paste: self.allow_url_paste,
            name_prefix,
            offer_thumbnail: self.offer_thumbnail,
            variants: self.variants,
        })
    }
}

fn validate_variants(variants: &[VariantSpec]) -> Result<(), ConfigError> {
    for tag in VariantTag::ALL {
        if variants.iter().filter(|s| s.tag == tag).count() > 1 {
            return Err(ConfigError::InvalidVariants(format!("duplicate tag {}", tag)));
        }
    }
    if !variants.iter().any(|s| s.tag == VariantTag::Original) {
        return Err(ConfigError::InvalidVariants(
            "an original entry is required".to_string(),
        ));
    }
    if let Some(spec) = variants.iter().find(|s| s.max_width == 0 || s.max_height == 0) {
        return Err(ConfigError::InvalidVariants(format!(
            "{} has an empty target box",
            spec.tag
        )));
    }
    Ok(())
}

/// Megabytes to bytes, rejecting values that do not fit in `usize`.
fn parse_size_mb(name: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let mb = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidSetting {
            name,
            message: format!("'{}' is not a number", raw),
        })?;
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| ConfigError::InvalidSetting {
            name,
            message: format!("{} MB is too large", mb),
        })
}
