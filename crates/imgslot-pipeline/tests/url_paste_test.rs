#[path = "helpers/mod.rs"]
mod helpers;

use helpers::fixtures::png_input;
use helpers::{setup_controller, BASE_URL};
use imgslot_core::{FieldConfig, FieldValue, PipelineError, PipelineOutcome, ValidationError};
use imgslot_pipeline::PipelineState;
use imgslot_storage::MemoryStorage;
use std::sync::Arc;

fn paste_field() -> FieldConfig {
    FieldConfig::builder("event-hackfest")
        .allow_url_paste(true)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_malformed_url_changes_nothing() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, listener) = setup_controller(paste_field(), storage.clone());

    let outcome = controller.paste_url("not a url");

    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected(PipelineError::Validation(ValidationError::MalformedUrl(_)))
    ));
    assert_eq!(controller.state(), PipelineState::Idle);
    assert!(listener.changes().is_empty());
    assert_eq!(storage.put_calls(), 0);
}

#[tokio::test]
async fn test_valid_url_becomes_value_without_variants() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, listener) = setup_controller(paste_field(), storage.clone());

    let outcome = controller.paste_url("https://cdn.example.com/x.png");

    let expected = FieldValue::External {
        url: "https://cdn.example.com/x.png".to_string(),
    };
    assert_eq!(outcome, PipelineOutcome::Updated(expected.clone()));
    assert_eq!(controller.state(), PipelineState::HasValue(expected));
    assert!(controller.value().unwrap().image_data().is_none());
    assert_eq!(
        listener.changes(),
        vec![("https://cdn.example.com/x.png".to_string(), false)]
    );
    assert_eq!(storage.put_calls(), 0);
}

#[tokio::test]
async fn test_paste_disabled_by_config() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let config = FieldConfig::builder("p").build().unwrap();
    let (controller, _listener) = setup_controller(config, storage);

    assert_eq!(
        controller.paste_url("https://cdn.example.com/x.png"),
        PipelineOutcome::Rejected(ValidationError::UrlPasteDisabled.into())
    );
    assert_eq!(controller.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_removing_pasted_url_never_touches_storage() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(paste_field(), storage.clone());

    // even a URL shaped like one of ours
    let lookalike = format!("{}/images/event-hackfest-original-abc123.webp", BASE_URL);
    assert!(controller.paste_url(&lookalike).is_success());
    assert_eq!(controller.remove().await, PipelineOutcome::Removed);

    assert_eq!(storage.remove_calls(), 0);
    assert_eq!(controller.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_paste_replaces_uploaded_value_without_deleting() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(paste_field(), storage.clone());

    assert!(controller.select_file(png_input(100, 100)).await.is_success());
    assert!(controller
        .paste_url("http://images.example.org/banner.jpg")
        .is_success());

    assert_eq!(storage.len().await, 3);
    assert_eq!(
        controller.value().map(|v| v.url().to_string()),
        Some("http://images.example.org/banner.jpg".to_string())
    );
}
