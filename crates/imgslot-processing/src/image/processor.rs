//! Image processor - decoding and SVG inspection

use image::{DynamicImage, ImageReader};
use imgslot_core::ProcessingError;
use regex::Regex;
use std::io::Cursor;
use std::sync::OnceLock;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode a raster bitstream, sniffing the format from its content.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::DecodeFailed(e.to_string()))?;

        if reader.format().is_none() {
            return Err(ProcessingError::DecodeFailed(
                "unrecognized image format".to_string(),
            ));
        }

        reader
            .decode()
            .map_err(|e| ProcessingError::DecodeFailed(e.to_string()))
    }

    /// Check that `data` is an SVG document and return its intrinsic size.
    ///
    /// The document must be UTF-8 and its first element must be `<svg>`,
    /// after an optional XML declaration, comments and doctype. Size comes
    /// from `width`/`height` on the root element, falling back to `viewBox`,
    /// and is `(0, 0)` when neither is usable.
    pub fn inspect_svg(data: &[u8]) -> Result<(u32, u32), ProcessingError> {
        let text = std::str::from_utf8(data)
            .map_err(|_| ProcessingError::DecodeFailed("SVG is not valid UTF-8".to_string()))?;
        let caps = svg_root_regex()
            .captures(text.trim_start_matches('\u{feff}'))
            .ok_or_else(|| ProcessingError::DecodeFailed("missing <svg> root element".to_string()))?;
        let root = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        let width = length_attribute(root, "width");
        let height = length_attribute(root, "height");
        if let (Some(w), Some(h)) = (width, height) {
            return Ok((w, h));
        }

        let size = viewbox_regex()
            .captures(root)
            .and_then(|caps| {
                let w = caps.get(1)?.as_str().parse::<f64>().ok()?;
                let h = caps.get(2)?.as_str().parse::<f64>().ok()?;
                Some((w.round().max(0.0) as u32, h.round().max(0.0) as u32))
            })
            .unwrap_or((0, 0));
        Ok(size)
    }
}

fn svg_root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)\A\s*(?:<\?xml.*?\?>\s*)?(?:(?:<!--.*?-->|<!DOCTYPE[^>]*>)\s*)*(<svg\b[^>]*>)",
        )
        .expect("valid regex")
    })
}

fn viewbox_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"viewBox\s*=\s*["']\s*[-\d.eE+]+[\s,]+[-\d.eE+]+[\s,]+([\d.eE+]+)[\s,]+([\d.eE+]+)\s*["']"#,
        )
        .expect("valid regex")
    })
}

fn length_attribute(root: &str, name: &str) -> Option<u32> {
    let pattern = format!(r#"\s{}\s*=\s*["']\s*([\d.]+)\s*(px)?\s*["']"#, name);
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(root)?.get(1)?.as_str().parse::<f64>().ok()?;
    Some(value.round().max(0.0) as u32)
}
