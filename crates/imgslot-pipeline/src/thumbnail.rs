//! Nested thumbnail slot
//!
//! A field that offers a thumbnail can mount a second, independent
//! controller for it when the user turns off "use same as main image". The
//! nested controller is built from `FieldConfig::thumbnail_config`, which
//! never offers a thumbnail itself, so nesting stops at one level.

use imgslot_core::{FieldListener, PipelineOutcome, ProcessedImage};
use std::sync::Arc;

use crate::controller::PipelineController;

/// Routes the nested field's value and alt text changes to the parent's
/// thumbnail hooks.
struct ThumbnailForwarder {
    parent: Arc<dyn FieldListener>,
}

impl FieldListener for ThumbnailForwarder {
    fn on_change(&self, url: &str, image: Option<&ProcessedImage>) {
        self.parent.on_thumbnail_change(url, image);
    }

    fn on_alt_text_change(&self, alt_text: &str) {
        self.parent.on_thumbnail_alt_text_change(alt_text);
    }

    fn on_outcome(&self, outcome: &PipelineOutcome) {
        tracing::debug!(success = outcome.is_success(), "Thumbnail slot operation finished");
    }
}

impl PipelineController {
    /// The nested thumbnail controller, if one is mounted.
    pub fn thumbnail(&self) -> Option<PipelineController> {
        self.lock().thumbnail.clone()
    }

    pub fn uses_same_thumbnail(&self) -> bool {
        self.lock().thumbnail.is_none()
    }

    /// Toggle "use same as main image".
    ///
    /// Turning it off mounts a nested controller under `{prefix}-thumb` and
    /// returns it. Turning it back on unmounts the nested controller and
    /// clears the thumbnail; its stored variants are not deleted. Returns
    /// `None` when this field does not offer a thumbnail.
    pub fn set_use_same_as_main(&self, same: bool) -> Option<PipelineController> {
        if !self.shared.config.offer_thumbnail() {
            return None;
        }

        let mut inner = self.lock();
        if !inner.mounted {
            return None;
        }

        if same {
            let nested = inner.thumbnail.take();
            drop(inner);
            if let Some(nested) = nested {
                nested.unmount();
                self.shared.listener.on_thumbnail_change("", None);
                tracing::debug!(prefix = %self.prefix(), "Thumbnail slot unmounted");
            }
            return None;
        }

        if let Some(existing) = &inner.thumbnail {
            return Some(existing.clone());
        }

        let nested = PipelineController::new(
            self.shared.config.thumbnail_config(),
            self.shared.components.clone(),
            Arc::new(ThumbnailForwarder {
                parent: self.shared.listener.clone(),
            }),
        );
        let alt_text = inner.alt_text.clone();
        inner.thumbnail = Some(nested.clone());
        drop(inner);

        if !alt_text.is_empty() {
            nested.set_alt_text(alt_text);
        }
        tracing::debug!(prefix = %nested.prefix(), "Thumbnail slot mounted");
        Some(nested)
    }
}
