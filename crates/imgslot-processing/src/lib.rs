//! imgslot processing library
//!
//! The stages of the image pipeline, leaf-first: validation, the alt-text
//! gate, variant generation, naming, the upload coordinator and the
//! deletion resolver.

pub mod alt_text;
pub mod deletion;
pub mod image;
pub mod naming;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use alt_text::check_accessibility_text;
pub use deletion::DeletionResolver;
pub use image::{CropRect, ImageProcessor, ImageResize, TargetBox, VariantGenerator, WebpEncoder};
pub use naming::{NameResolver, StoragePath};
pub use upload::{InFlightGuard, ProgressTracker, UploadCoordinator};
pub use validator::{extension_for_mime, mime_for_extension, validate, ImageValidator};
