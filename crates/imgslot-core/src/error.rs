//! Error types module
//!
//! The four error families below mirror how a failure is surfaced:
//! validation problems are shown inline, processing problems ask for another
//! file, upload problems become a generic failure and deletion problems are
//! only logged. `PipelineError` unifies them for code that handles any stage.

use crate::models::VariantTag;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected, user-correctable failures
    Debug,
    /// Recoverable issues and swallowed cleanup failures
    Warn,
    /// Unexpected failures
    Error,
}

/// Describes how an error should be presented and logged.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UNSUPPORTED_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether the user can fix this by changing their input
    fn is_user_correctable(&self) -> bool;

    /// Whether the caller ever sees this error
    fn is_surfaced(&self) -> bool {
        true
    }

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Message suitable for display next to the field
    fn client_message(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported image type: {mime_type}")]
    UnsupportedType { mime_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Alternative text is required before uploading")]
    MissingAltText,

    #[error("Invalid URL: {0}")]
    MalformedUrl(String),

    #[error("Pasting URLs is not enabled for this field")]
    UrlPasteDisabled,

    #[error("An image is required")]
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode variant: {0}")]
    EncodeFailed(String),

    #[error("Image worker failed: {0}")]
    WorkerFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Upload failed: {0}")]
    NetworkFailure(String),

    #[error("Upload failed after storing {completed_tags:?}: {message}")]
    PartialFailure {
        completed_tags: Vec<VariantTag>,
        message: String,
    },

    #[error("An upload is already in progress for {prefix}")]
    InFlight { prefix: String },

    #[error("No original variant to upload")]
    MissingOriginal,
}

impl UploadError {
    /// Tags durably stored before the failure; these are orphans now.
    pub fn completed_tags(&self) -> &[VariantTag] {
        match self {
            UploadError::PartialFailure { completed_tags, .. } => completed_tags,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeletionError {
    #[error("Failed to remove {path}: {message}")]
    Storage { path: String, message: String },

    #[error("Failed to remove {failed} of {attempted} objects")]
    Incomplete { attempted: usize, failed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Deletion(#[from] DeletionError),
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            ValidationError::TooLarge { .. } => "TOO_LARGE",
            ValidationError::MissingAltText => "MISSING_ALT_TEXT",
            ValidationError::MalformedUrl(_) => "MALFORMED_URL",
            ValidationError::UrlPasteDisabled => "URL_PASTE_DISABLED",
            ValidationError::Required => "REQUIRED",
        }
    }

    fn is_user_correctable(&self) -> bool {
        true
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn client_message(&self) -> String {
        match self {
            ValidationError::UnsupportedType { .. } => {
                "Please choose a JPEG, PNG, GIF, WebP or SVG image".to_string()
            }
            ValidationError::TooLarge { max, .. } => {
                format!("Images must be at most {} MB", max / (1024 * 1024))
            }
            other => other.to_string(),
        }
    }
}

impl ErrorMetadata for ProcessingError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessingError::DecodeFailed(_) => "DECODE_FAILED",
            ProcessingError::EncodeFailed(_) => "ENCODE_FAILED",
            ProcessingError::WorkerFailed(_) => "WORKER_FAILED",
        }
    }

    fn is_user_correctable(&self) -> bool {
        true
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Warn
    }

    fn client_message(&self) -> String {
        "Could not process image, try a different file".to_string()
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::NetworkFailure(_) => "NETWORK_FAILURE",
            UploadError::PartialFailure { .. } => "PARTIAL_FAILURE",
            UploadError::InFlight { .. } => "UPLOAD_IN_FLIGHT",
            UploadError::MissingOriginal => "MISSING_ORIGINAL",
        }
    }

    fn is_user_correctable(&self) -> bool {
        matches!(self, UploadError::InFlight { .. })
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::InFlight { .. } => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::InFlight { .. } => "Please wait for the current upload to finish".to_string(),
            _ => "Upload failed, please try again".to_string(),
        }
    }
}

impl ErrorMetadata for DeletionError {
    fn error_code(&self) -> &'static str {
        match self {
            DeletionError::Storage { .. } => "DELETE_FAILED",
            DeletionError::Incomplete { .. } => "DELETE_INCOMPLETE",
        }
    }

    fn is_user_correctable(&self) -> bool {
        false
    }

    fn is_surfaced(&self) -> bool {
        false
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Warn
    }

    fn client_message(&self) -> String {
        String::new()
    }
}

impl ErrorMetadata for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Validation(e) => e.error_code(),
            PipelineError::Processing(e) => e.error_code(),
            PipelineError::Upload(e) => e.error_code(),
            PipelineError::Deletion(e) => e.error_code(),
        }
    }

    fn is_user_correctable(&self) -> bool {
        match self {
            PipelineError::Validation(e) => e.is_user_correctable(),
            PipelineError::Processing(e) => e.is_user_correctable(),
            PipelineError::Upload(e) => e.is_user_correctable(),
            PipelineError::Deletion(e) => e.is_user_correctable(),
        }
    }

    fn is_surfaced(&self) -> bool {
        !matches!(self, PipelineError::Deletion(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::Validation(e) => e.log_level(),
            PipelineError::Processing(e) => e.log_level(),
            PipelineError::Upload(e) => e.log_level(),
            PipelineError::Deletion(e) => e.log_level(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            PipelineError::Validation(e) => e.client_message(),
            PipelineError::Processing(e) => e.client_message(),
            PipelineError::Upload(e) => e.client_message(),
            PipelineError::Deletion(e) => e.client_message(),
        }
    }
}

impl PipelineError {
    /// Emit this error through `tracing` at its own level.
    pub fn log(&self, prefix: &str) {
        match self.log_level() {
            LogLevel::Debug => {
                tracing::debug!(prefix = %prefix, code = self.error_code(), error = %self, "Image rejected")
            }
            LogLevel::Warn => {
                tracing::warn!(prefix = %prefix, code = self.error_code(), error = %self, "Image pipeline warning")
            }
            LogLevel::Error => {
                tracing::error!(prefix = %prefix, code = self.error_code(), error = %self, "Image pipeline failure")
            }
        }
    }
}
