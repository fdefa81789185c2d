pub mod asset;
pub mod image;
pub mod variant;

pub use asset::AssetMetadata;
pub use image::{FieldValue, GeneratedVariant, ProcessedImage, RawInput, UploadedVariant};
pub use variant::{Fit, VariantSpec, VariantTag, DEFAULT_VARIANTS};
