//! Shared plumbing for the imgslot command-line tools.

use anyhow::{Context, Result};
use imgslot_core::{FieldListener, PipelineOutcome, ProcessedImage, RawInput};
use imgslot_processing::mime_for_extension;
use std::path::Path;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Read a file into a `RawInput`.
///
/// The MIME type comes from `mime_override` when given, otherwise from the
/// file extension. Unknown extensions become `application/octet-stream`,
/// which the validator then rejects.
pub async fn read_input(path: &Path, mime_override: Option<&str>) -> Result<RawInput> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mime_type = match mime_override {
        Some(mime) => mime.to_string(),
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    let raw = RawInput::new(bytes, mime_type);
    Ok(match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => raw.with_filename(name),
        None => raw,
    })
}

/// Reports field events through `tracing`.
pub struct LoggingListener;

impl FieldListener for LoggingListener {
    fn on_change(&self, url: &str, image: Option<&ProcessedImage>) {
        tracing::info!(
            url = %url,
            variants = image.map_or(0, |i| i.variants().len()),
            "Field value changed"
        );
    }

    fn on_outcome(&self, outcome: &PipelineOutcome) {
        if let Some(err) = outcome.error() {
            tracing::debug!(error = %err, "Operation did not succeed");
        }
    }
}
