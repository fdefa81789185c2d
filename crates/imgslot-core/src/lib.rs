//! imgslot core library
//!
//! This crate provides the domain model, error taxonomy, configuration and
//! listener hooks shared by every imgslot component.

pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AspectRatio, ConfigError, FieldConfig, FieldConfigBuilder, PipelineSettings};
pub use error::{
    DeletionError, ErrorMetadata, LogLevel, PipelineError, ProcessingError, UploadError,
    ValidationError,
};
pub use hooks::{FieldListener, NoOpFieldListener, PipelineOutcome};
pub use models::{
    AssetMetadata, FieldValue, Fit, GeneratedVariant, ProcessedImage, RawInput, UploadedVariant,
    VariantSpec, VariantTag,
};
pub use storage_types::StorageBackend;
