//! Image processing module
//!
//! - Decoding and SVG inspection (processor)
//! - Target box computation and resampling (resize)
//! - WebP re-encoding (encode)
//! - Variant generation from a variant table (generator)

pub mod encode;
pub mod generator;
pub mod processor;
pub mod resize;

pub use encode::WebpEncoder;
pub use generator::VariantGenerator;
pub use processor::ImageProcessor;
pub use resize::{CropRect, ImageResize, TargetBox};
