//! Process-wide constants.

/// Maximum accepted input size (50 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// MIME types accepted by the validator.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// MIME type of every re-encoded raster variant.
pub const OUTPUT_MIME_TYPE: &str = "image/webp";

/// File extension of every re-encoded raster variant.
pub const OUTPUT_EXTENSION: &str = "webp";

/// MIME type of vector input, which bypasses re-encoding.
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Default WebP quality (0-100).
pub const DEFAULT_WEBP_QUALITY: f32 = 85.0;

/// Path segment that marks a URL as produced by this pipeline.
pub const IMAGES_SEGMENT: &str = "images";

/// Suffix appended to a parent prefix for the nested thumbnail slot.
pub const THUMBNAIL_PREFIX_SUFFIX: &str = "-thumb";
