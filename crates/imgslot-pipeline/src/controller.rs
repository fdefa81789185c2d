use imgslot_core::{
    ErrorMetadata, FieldConfig, FieldListener, FieldValue, PipelineError, PipelineOutcome,
    ProcessedImage, RawInput, UploadError, ValidationError,
};
use imgslot_processing::{check_accessibility_text, DeletionResolver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use url::Url;

use crate::components::PipelineComponents;
use crate::state::{derive_state, Activity, PipelineState};

pub(crate) struct Inner {
    pub(crate) value: Option<FieldValue>,
    pub(crate) activity: Activity,
    pub(crate) alt_text: String,
    /// Bumped by every operation that supersedes an in-flight upload.
    pub(crate) generation: u64,
    pub(crate) mounted: bool,
    pub(crate) thumbnail: Option<PipelineController>,
}

pub(crate) struct Shared {
    pub(crate) config: FieldConfig,
    pub(crate) components: PipelineComponents,
    pub(crate) listener: Arc<dyn FieldListener>,
    deletion: DeletionResolver,
    state_tx: watch::Sender<PipelineState>,
    inner: Mutex<Inner>,
}

/// State machine for one image field.
///
/// Every user operation resolves to a [`PipelineOutcome`]; errors never
/// escape as `Err`. Clones are handles to the same field.
#[derive(Clone)]
pub struct PipelineController {
    pub(crate) shared: Arc<Shared>,
}

impl PipelineController {
    pub fn new(
        config: FieldConfig,
        components: PipelineComponents,
        listener: Arc<dyn FieldListener>,
    ) -> Self {
        let tags = config.variants().iter().map(|spec| spec.tag).collect();
        let deletion = DeletionResolver::with_variants(components.storage().clone(), tags);
        let (state_tx, _) = watch::channel(PipelineState::Idle);

        Self {
            shared: Arc::new(Shared {
                config,
                components,
                listener,
                deletion,
                state_tx,
                inner: Mutex::new(Inner {
                    value: None,
                    activity: Activity::None,
                    alt_text: String::new(),
                    generation: 0,
                    mounted: true,
                    thumbnail: None,
                }),
            }),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.shared.config
    }

    pub fn prefix(&self) -> &str {
        self.shared.config.name_prefix()
    }

    pub fn state(&self) -> PipelineState {
        self.shared.state_tx.borrow().clone()
    }

    /// Observe state changes, including upload progress.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.shared.state_tx.subscribe()
    }

    pub fn value(&self) -> Option<FieldValue> {
        self.lock().value.clone()
    }

    pub fn alt_text(&self) -> String {
        self.lock().alt_text.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    /// Seed the field with a previously saved value. Listeners are not told.
    pub fn load_value(&self, value: FieldValue) {
        let mut inner = self.lock();
        inner.value = Some(value);
        self.publish(&inner);
    }

    pub fn drag_enter(&self) {
        let mut inner = self.lock();
        if inner.mounted && matches!(inner.activity, Activity::None | Activity::Error { .. }) {
            inner.activity = Activity::Dragging;
            self.publish(&inner);
        }
    }

    pub fn drag_leave(&self) {
        let mut inner = self.lock();
        if inner.activity == Activity::Dragging {
            inner.activity = Activity::None;
            self.publish(&inner);
        }
    }

    pub fn set_alt_text(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut inner = self.lock();
            if !inner.mounted {
                return;
            }
            inner.alt_text = text.clone();
        }
        self.shared.listener.on_alt_text_change(&text);
    }

    /// Validate, generate, upload and apply a selected or dropped file.
    ///
    /// Type, size and alt text are checked before anything else runs, so a
    /// rejected file never reaches the generator or storage.
    pub async fn select_file(&self, raw: RawInput) -> PipelineOutcome {
        let prefix = self.prefix().to_string();
        let alt_text = {
            let mut inner = self.lock();
            if !inner.mounted {
                return PipelineOutcome::Discarded;
            }
            if inner.activity == Activity::Dragging {
                inner.activity = Activity::None;
                self.publish(&inner);
            }
            inner.alt_text.clone()
        };

        let checked = self
            .shared
            .components
            .validator
            .validate(&raw.mime_type, raw.byte_size())
            .and_then(|_| check_accessibility_text(&alt_text));
        if let Err(e) = checked {
            return self.reject_with_error(e.into());
        }

        let guard = match self.shared.components.coordinator.try_reserve(&prefix) {
            Ok(guard) => guard,
            Err(e) => return self.finish(PipelineOutcome::Rejected(e.into())),
        };

        let op = {
            let mut inner = self.lock();
            if !inner.mounted {
                return PipelineOutcome::Discarded;
            }
            inner.generation += 1;
            inner.activity = Activity::Uploading { progress: 0 };
            self.publish(&inner);
            inner.generation
        };

        tracing::debug!(
            prefix = %prefix,
            mime_type = %raw.mime_type,
            size_bytes = raw.byte_size(),
            "Processing image"
        );

        let variants = match self
            .shared
            .components
            .generator
            .generate_offloaded(raw, self.shared.config.variants().to_vec())
            .await
        {
            Ok(variants) => variants,
            Err(e) => return self.fail(op, e.into()),
        };

        let progress_target = self.clone();
        let result = self
            .shared
            .components
            .coordinator
            .upload_reserved(&guard, variants, move |progress| {
                progress_target.set_progress(op, progress)
            })
            .await;
        drop(guard);

        match result {
            Ok(image) => self.apply_upload(op, image).await,
            Err(e) => self.fail(op, e.into()),
        }
    }

    /// Upload a new file over the current value.
    ///
    /// The previous value's variants are left in storage; only [`remove`]
    /// deletes.
    ///
    /// [`remove`]: PipelineController::remove
    pub async fn replace(&self, raw: RawInput) -> PipelineOutcome {
        self.select_file(raw).await
    }

    /// Accept a URL typed or pasted by the user.
    ///
    /// Skips validation, generation and upload. The value carries no
    /// variant metadata. A malformed URL is rejected without changing state.
    pub fn paste_url(&self, input: &str) -> PipelineOutcome {
        if !self.is_mounted() {
            return PipelineOutcome::Discarded;
        }
        if !self.shared.config.allow_url_paste() {
            return self.finish(PipelineOutcome::Rejected(
                ValidationError::UrlPasteDisabled.into(),
            ));
        }
        if self.shared.components.coordinator.is_in_flight(self.prefix()) {
            return self.finish(PipelineOutcome::Rejected(
                UploadError::InFlight {
                    prefix: self.prefix().to_string(),
                }
                .into(),
            ));
        }

        let url = match parse_pasted_url(input) {
            Ok(url) => url,
            Err(e) => return self.finish(PipelineOutcome::Rejected(e.into())),
        };
        let value = FieldValue::External { url: url.clone() };

        {
            let mut inner = self.lock();
            if !inner.mounted {
                return PipelineOutcome::Discarded;
            }
            inner.generation += 1;
            inner.value = Some(value.clone());
            inner.activity = Activity::None;
            self.publish(&inner);
        }

        tracing::info!(prefix = %self.prefix(), url = %url, "External image URL applied");
        self.shared.listener.on_change(&url, None);
        self.finish(PipelineOutcome::Updated(value))
    }

    /// Clear the field and delete the stored variants of its value.
    ///
    /// The field is cleared first; deletion failures are logged only. An
    /// upload still in flight is superseded and its result deleted on arrival.
    pub async fn remove(&self) -> PipelineOutcome {
        let previous = {
            let mut inner = self.lock();
            if !inner.mounted {
                return PipelineOutcome::Discarded;
            }
            inner.generation += 1;
            inner.activity = Activity::None;
            let previous = inner.value.take();
            self.publish(&inner);
            previous
        };

        self.shared.listener.on_change("", None);

        // pasted URLs were never written by this pipeline
        if let Some(FieldValue::Processed(image)) = &previous {
            if let Err(e) = self
                .shared
                .deletion
                .resolve_and_delete(image.original_url())
                .await
            {
                PipelineError::from(e).log(self.prefix());
            }
        }

        tracing::info!(prefix = %self.prefix(), "Image field cleared");
        self.finish(PipelineOutcome::Removed)
    }

    /// Detach from the host. Results that arrive later are dropped without
    /// touching state or listeners.
    pub fn unmount(&self) {
        let thumbnail = {
            let mut inner = self.lock();
            if !inner.mounted {
                return;
            }
            inner.mounted = false;
            inner.generation += 1;
            inner.thumbnail.take()
        };
        if let Some(thumbnail) = thumbnail {
            thumbnail.unmount();
        }
        tracing::debug!(prefix = %self.prefix(), "Image field unmounted");
    }

    /// Fails with `Required` when the field is required and empty.
    pub fn ensure_complete(&self) -> Result<(), ValidationError> {
        let mut inner = self.lock();
        if !self.shared.config.required() || inner.value.is_some() {
            return Ok(());
        }

        let err = ValidationError::Required;
        if !matches!(inner.activity, Activity::Uploading { .. }) {
            inner.activity = Activity::Error {
                code: err.error_code(),
                message: err.client_message(),
            };
            self.publish(&inner);
        }
        Err(err)
    }

    pub fn dismiss_error(&self) {
        let mut inner = self.lock();
        if matches!(inner.activity, Activity::Error { .. }) {
            inner.activity = Activity::None;
            self.publish(&inner);
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.shared
            .state_tx
            .send_replace(derive_state(&inner.activity, inner.value.as_ref()));
    }

    fn set_progress(&self, op: u64, progress: u8) {
        let mut inner = self.lock();
        if inner.mounted
            && inner.generation == op
            && matches!(inner.activity, Activity::Uploading { .. })
        {
            inner.activity = Activity::Uploading { progress };
            self.publish(&inner);
        }
    }

    async fn apply_upload(&self, op: u64, image: ProcessedImage) -> PipelineOutcome {
        let superseded = {
            let mut inner = self.lock();
            if !inner.mounted {
                tracing::debug!(prefix = %self.prefix(), "Upload finished after unmount, result dropped");
                return PipelineOutcome::Discarded;
            }
            if inner.generation != op {
                true
            } else {
                inner.value = Some(FieldValue::Processed(image.clone()));
                inner.activity = Activity::None;
                self.publish(&inner);
                false
            }
        };

        if superseded {
            tracing::info!(
                prefix = %self.prefix(),
                url = %image.original_url(),
                "Upload finished after removal, deleting its variants"
            );
            if let Err(e) = self.shared.deletion.delete_processed(&image).await {
                PipelineError::from(e).log(self.prefix());
            }
            return self.finish(PipelineOutcome::Discarded);
        }

        self.shared
            .listener
            .on_change(image.original_url(), Some(&image));
        self.finish(PipelineOutcome::Updated(FieldValue::Processed(image)))
    }

    fn fail(&self, op: u64, err: PipelineError) -> PipelineOutcome {
        {
            let mut inner = self.lock();
            if !inner.mounted || inner.generation != op {
                tracing::debug!(prefix = %self.prefix(), error = %err, "Superseded operation failed");
                return PipelineOutcome::Discarded;
            }
            inner.activity = Activity::Error {
                code: err.error_code(),
                message: err.client_message(),
            };
            self.publish(&inner);
        }
        self.finish(PipelineOutcome::Failed(err))
    }

    fn reject_with_error(&self, err: PipelineError) -> PipelineOutcome {
        {
            let mut inner = self.lock();
            if !inner.mounted {
                return PipelineOutcome::Discarded;
            }
            // a running upload keeps its progress display
            if !matches!(inner.activity, Activity::Uploading { .. }) {
                inner.activity = Activity::Error {
                    code: err.error_code(),
                    message: err.client_message(),
                };
                self.publish(&inner);
            }
        }
        self.finish(PipelineOutcome::Rejected(err))
    }

    fn finish(&self, outcome: PipelineOutcome) -> PipelineOutcome {
        if let Some(err) = outcome.error() {
            err.log(self.prefix());
        }
        if self.is_mounted() {
            self.shared.listener.on_outcome(&outcome);
        }
        outcome
    }
}

/// Accept absolute http(s) URLs with a host.
fn parse_pasted_url(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let parsed =
        Url::parse(trimmed).map_err(|e| ValidationError::MalformedUrl(format!("{}: {}", trimmed, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::MalformedUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::MalformedUrl(format!(
            "{}: missing host",
            trimmed
        )));
    }
    Ok(parsed.to_string())
}
