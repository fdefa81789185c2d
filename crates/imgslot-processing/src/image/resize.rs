use image::{DynamicImage, GenericImageView};
use imgslot_core::{Fit, VariantSpec};

/// Source region to keep before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Output dimensions for one variant, with an optional crop applied first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBox {
    pub width: u32,
    pub height: u32,
    pub crop: Option<CropRect>,
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Compute the target box for a source of the given size.
    ///
    /// Sources are never upscaled. For `Cover` with a source smaller than the
    /// box, the crop still takes the box's aspect ratio and the output keeps
    /// the cropped size.
    pub fn calculate_target(orig_width: u32, orig_height: u32, spec: &VariantSpec) -> TargetBox {
        let orig_width = orig_width.max(1);
        let orig_height = orig_height.max(1);
        let scale_width = spec.max_width as f64 / orig_width as f64;
        let scale_height = spec.max_height as f64 / orig_height as f64;

        match spec.fit {
            Fit::Contain => {
                let scale = scale_width.min(scale_height).min(1.0);
                TargetBox {
                    width: scaled(orig_width, scale).min(spec.max_width),
                    height: scaled(orig_height, scale).min(spec.max_height),
                    crop: None,
                }
            }
            Fit::Cover => {
                let box_ratio = spec.max_width as f64 / spec.max_height as f64;
                let src_ratio = orig_width as f64 / orig_height as f64;

                let (crop_width, crop_height) = if src_ratio > box_ratio {
                    let w = (orig_height as f64 * box_ratio).round() as u32;
                    (w.clamp(1, orig_width), orig_height)
                } else {
                    let h = (orig_width as f64 / box_ratio).round() as u32;
                    (orig_width, h.clamp(1, orig_height))
                };

                let crop = if (crop_width, crop_height) == (orig_width, orig_height) {
                    None
                } else {
                    Some(CropRect {
                        x: (orig_width - crop_width) / 2,
                        y: (orig_height - crop_height) / 2,
                        width: crop_width,
                        height: crop_height,
                    })
                };

                let (width, height) = if scale_width.max(scale_height) >= 1.0 {
                    (crop_width.min(spec.max_width), crop_height.min(spec.max_height))
                } else {
                    (spec.max_width, spec.max_height)
                };

                TargetBox {
                    width,
                    height,
                    crop,
                }
            }
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Produce a new image for `spec`. The source is left untouched.
    pub fn apply(img: &DynamicImage, spec: &VariantSpec) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let target = Self::calculate_target(orig_width, orig_height, spec);

        let cropped = match target.crop {
            Some(rect) => img.crop_imm(rect.x, rect.y, rect.width, rect.height),
            None => img.clone(),
        };

        let (w, h) = cropped.dimensions();
        if (w, h) == (target.width, target.height) {
            return cropped;
        }

        let filter = Self::select_filter(w, h, target.width, target.height);
        cropped.resize_exact(target.width, target.height, filter)
    }
}

fn scaled(length: u32, scale: f64) -> u32 {
    ((length as f64 * scale).round() as u32).max(1)
}
