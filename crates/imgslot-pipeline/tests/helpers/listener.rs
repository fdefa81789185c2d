use imgslot_core::{FieldListener, PipelineOutcome, ProcessedImage};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    Change { url: String, has_image: bool },
    AltText(String),
    ThumbnailAltText(String),
    ThumbnailChange { url: String, has_image: bool },
    Outcome { success: bool },
}

/// Records every callback in order.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ListenerEvent>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ListenerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn changes(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ListenerEvent::Change { url, has_image } => Some((url, has_image)),
                _ => None,
            })
            .collect()
    }

    pub fn thumbnail_changes(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ListenerEvent::ThumbnailChange { url, has_image } => Some((url, has_image)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ListenerEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl FieldListener for RecordingListener {
    fn on_change(&self, url: &str, image: Option<&ProcessedImage>) {
        self.push(ListenerEvent::Change {
            url: url.to_string(),
            has_image: image.is_some(),
        });
    }

    fn on_alt_text_change(&self, alt_text: &str) {
        self.push(ListenerEvent::AltText(alt_text.to_string()));
    }

    fn on_thumbnail_change(&self, url: &str, image: Option<&ProcessedImage>) {
        self.push(ListenerEvent::ThumbnailChange {
            url: url.to_string(),
            has_image: image.is_some(),
        });
    }

    fn on_thumbnail_alt_text_change(&self, alt_text: &str) {
        self.push(ListenerEvent::ThumbnailAltText(alt_text.to_string()));
    }

    fn on_outcome(&self, outcome: &PipelineOutcome) {
        self.push(ListenerEvent::Outcome {
            success: outcome.is_success(),
        });
    }
}
