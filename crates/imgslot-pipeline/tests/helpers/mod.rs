#![allow(dead_code)]

pub mod fixtures;
pub mod listener;
pub mod storage;

use imgslot_core::FieldConfig;
use imgslot_pipeline::{PipelineComponents, PipelineController};
use imgslot_storage::Storage;
use listener::RecordingListener;
use std::sync::Arc;

pub const BASE_URL: &str = "https://cdn.test/storage";

/// Field config with the default variant table.
pub fn field(prefix: &str) -> FieldConfig {
    FieldConfig::builder(prefix).build().unwrap()
}

/// Controller with alt text already set, so uploads pass the gate.
pub fn setup_controller(
    config: FieldConfig,
    storage: Arc<dyn Storage>,
) -> (PipelineController, Arc<RecordingListener>) {
    let listener = RecordingListener::new();
    let controller = PipelineController::new(
        config,
        PipelineComponents::with_defaults(storage),
        listener.clone(),
    );
    controller.set_alt_text("Team photo");
    (controller, listener)
}
