use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use imgslot_core::constants::DEFAULT_WEBP_QUALITY;
use imgslot_core::ProcessingError;

/// Lossy WebP encoder at a fixed quality.
#[derive(Debug, Clone, Copy)]
pub struct WebpEncoder {
    quality: f32,
}

impl Default for WebpEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_WEBP_QUALITY)
    }
}

impl WebpEncoder {
    /// Quality is clamped to 0-100.
    pub fn new(quality: f32) -> Self {
        Self {
            quality: quality.clamp(0.0, 100.0),
        }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn encode(&self, img: &DynamicImage) -> Result<Bytes, ProcessingError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ProcessingError::EncodeFailed(format!(
                "cannot encode an empty {}x{} image",
                width, height
            )));
        }

        // Alpha channels need the RGBA path; everything else goes through RGB
        let encoded = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            webp::Encoder::from_rgba(&rgba, width, height).encode(self.quality)
        } else {
            let rgb = img.to_rgb8();
            webp::Encoder::from_rgb(&rgb, width, height).encode(self.quality)
        };

        if encoded.is_empty() {
            return Err(ProcessingError::EncodeFailed(
                "encoder produced no output".to_string(),
            ));
        }

        Ok(Bytes::copy_from_slice(&encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_encode_rgb_produces_webp() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([10, 20, 30])));
        let bytes = WebpEncoder::default().encode(&img).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 32));
    }

    #[test]
    fn test_encode_rgba_produces_webp() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 128])));
        let bytes = WebpEncoder::new(50.0).encode(&img).unwrap();
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_empty_image_fails() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(
            WebpEncoder::default().encode(&img),
            Err(ProcessingError::EncodeFailed(_))
        ));
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(WebpEncoder::new(150.0).quality(), 100.0);
        assert_eq!(WebpEncoder::new(-1.0).quality(), 0.0);
    }
}
