//! Hooks for the code that hosts an image field
//!
//! The pipeline never talks to a notification system or a form directly.
//! It reports value changes and terminal outcomes through `FieldListener`,
//! and the host decides how to surface them.

use crate::error::PipelineError;
use crate::models::{FieldValue, ProcessedImage};

/// Terminal result of one user operation on a field.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// A new value was stored and applied to the field.
    Updated(FieldValue),
    /// The field was cleared.
    Removed,
    /// The operation was refused; the field state did not change.
    Rejected(PipelineError),
    /// The operation ran and failed; the field shows an error.
    Failed(PipelineError),
    /// The operation completed after the field moved on; nothing was applied.
    Discarded,
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Updated(_) | PipelineOutcome::Removed)
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            PipelineOutcome::Rejected(e) | PipelineOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Receives field events.
///
/// Methods are called from the task driving the operation, never after the
/// field has been unmounted.
pub trait FieldListener: Send + Sync {
    /// The field value changed. An empty `url` means the field was cleared.
    fn on_change(&self, url: &str, image: Option<&ProcessedImage>);

    /// The alternative text changed.
    fn on_alt_text_change(&self, _alt_text: &str) {}

    /// The nested thumbnail value changed. An empty `url` means it was cleared.
    fn on_thumbnail_change(&self, _url: &str, _image: Option<&ProcessedImage>) {}

    /// The nested thumbnail's alternative text changed.
    fn on_thumbnail_alt_text_change(&self, _alt_text: &str) {}

    /// An operation reached its terminal result.
    fn on_outcome(&self, _outcome: &PipelineOutcome) {}
}

/// Listener that ignores every event
pub struct NoOpFieldListener;

impl FieldListener for NoOpFieldListener {
    fn on_change(&self, _url: &str, _image: Option<&ProcessedImage>) {}
}
