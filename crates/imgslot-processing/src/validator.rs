use imgslot_core::constants::{ALLOWED_CONTENT_TYPES, MAX_FILE_SIZE_BYTES};
use imgslot_core::{PipelineSettings, ValidationError};

/// Image input validator
///
/// Checks the declared MIME type and byte size only; the bytes themselves
/// are looked at by the variant generator.
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::new(
            MAX_FILE_SIZE_BYTES,
            ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl ImageValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(
            settings.max_file_size_bytes,
            settings.allowed_content_types.clone(),
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate content type. Parameters such as `; charset=` are ignored.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_mime(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::UnsupportedType {
                mime_type: content_type.to_string(),
            });
        }
        Ok(())
    }

    /// Size is checked first, so oversized input is `TooLarge` whatever its type.
    pub fn validate(&self, mime_type: &str, byte_size: usize) -> Result<(), ValidationError> {
        self.validate_file_size(byte_size)?;
        self.validate_content_type(mime_type)?;
        Ok(())
    }
}

/// Validate against the built-in allow-list and the 50 MiB ceiling.
pub fn validate(mime_type: &str, byte_size: usize) -> Result<(), ValidationError> {
    ImageValidator::default().validate(mime_type, byte_size)
}

fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// File extension used when storing a given MIME type.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match normalize_mime(mime_type).as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// MIME type for a file extension, for inputs that arrive without one.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
