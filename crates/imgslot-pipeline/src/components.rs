use imgslot_core::PipelineSettings;
use imgslot_processing::{ImageValidator, UploadCoordinator, VariantGenerator};
use imgslot_storage::Storage;
use std::sync::Arc;

/// Stages shared by every controller on a page.
///
/// Controllers built from clones of one `PipelineComponents` share the
/// coordinator's in-flight table, so two fields with the same prefix cannot
/// upload at once.
#[derive(Clone)]
pub struct PipelineComponents {
    pub validator: ImageValidator,
    pub generator: VariantGenerator,
    pub coordinator: UploadCoordinator,
}

impl PipelineComponents {
    pub fn new(storage: Arc<dyn Storage>, settings: &PipelineSettings) -> Self {
        Self {
            validator: ImageValidator::from_settings(settings),
            generator: VariantGenerator::from_settings(settings),
            coordinator: UploadCoordinator::new(storage),
        }
    }

    /// Built-in limits and quality.
    pub fn with_defaults(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, &PipelineSettings::default())
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        self.coordinator.storage()
    }
}
