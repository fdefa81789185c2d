use bytes::Bytes;
use image::GenericImageView;
use imgslot_core::constants::{OUTPUT_MIME_TYPE, SVG_MIME_TYPE};
use imgslot_core::{GeneratedVariant, PipelineSettings, ProcessingError, RawInput, VariantSpec, VariantTag};
use std::time::Instant;

use super::encode::WebpEncoder;
use super::processor::ImageProcessor;
use super::resize::ImageResize;

/// Produces the variant set for one input.
///
/// Pure with respect to its input: the same bytes and table always give the
/// same variants, and the input is never modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantGenerator {
    encoder: WebpEncoder,
}

impl VariantGenerator {
    pub fn new(quality: f32) -> Self {
        Self {
            encoder: WebpEncoder::new(quality),
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(settings.webp_quality)
    }

    pub fn quality(&self) -> f32 {
        self.encoder.quality()
    }

    /// Generate every variant in `specs`, ordered by tag.
    ///
    /// Vector input passes through unchanged as the only (original) variant.
    /// Any decode or encode failure fails the whole call.
    pub fn generate(
        &self,
        raw: &RawInput,
        specs: &[VariantSpec],
    ) -> Result<Vec<GeneratedVariant>, ProcessingError> {
        if raw.media_type() == SVG_MIME_TYPE {
            return Ok(vec![Self::passthrough_svg(raw)?]);
        }

        let start = Instant::now();
        let source = ImageProcessor::decode(&raw.bytes)?;
        let (source_width, source_height) = source.dimensions();

        let mut specs: Vec<&VariantSpec> = specs.iter().collect();
        specs.sort_by_key(|spec| spec.tag);

        let mut variants = Vec::with_capacity(specs.len());
        for spec in specs {
            let resized = ImageResize::apply(&source, spec);
            let (width, height) = resized.dimensions();
            let bytes = self.encoder.encode(&resized)?;

            variants.push(GeneratedVariant {
                tag: spec.tag,
                bytes,
                width,
                height,
                mime_type: OUTPUT_MIME_TYPE.to_string(),
            });
        }

        tracing::debug!(
            source_width = source_width,
            source_height = source_height,
            variants = variants.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generated image variants"
        );

        Ok(variants)
    }

    /// [`generate`](Self::generate) on the blocking pool.
    pub async fn generate_offloaded(
        &self,
        raw: RawInput,
        specs: Vec<VariantSpec>,
    ) -> Result<Vec<GeneratedVariant>, ProcessingError> {
        let generator = *self;
        tokio::task::spawn_blocking(move || generator.generate(&raw, &specs))
            .await
            .map_err(|e| ProcessingError::WorkerFailed(e.to_string()))?
    }

    fn passthrough_svg(raw: &RawInput) -> Result<GeneratedVariant, ProcessingError> {
        let (width, height) = ImageProcessor::inspect_svg(&raw.bytes)?;
        Ok(GeneratedVariant {
            tag: VariantTag::Original,
            bytes: Bytes::copy_from_slice(&raw.bytes),
            width,
            height,
            mime_type: SVG_MIME_TYPE.to_string(),
        })
    }
}
