#[path = "helpers/mod.rs"]
mod helpers;

use helpers::fixtures::{jpeg_input, png_input};
use helpers::listener::ListenerEvent;
use helpers::storage::FailingStorage;
use helpers::{field, setup_controller, BASE_URL};
use imgslot_core::{
    FieldConfig, FieldValue, PipelineError, PipelineOutcome, PipelineSettings, ProcessingError,
    RawInput, UploadError, ValidationError, VariantTag,
};
use imgslot_pipeline::{PipelineComponents, PipelineController, PipelineState};
use imgslot_storage::MemoryStorage;
use std::sync::Arc;

#[tokio::test]
async fn test_team_photo_produces_three_variants() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, listener) = setup_controller(field("event-hackfest"), storage.clone());

    let outcome = controller.select_file(jpeg_input(1600, 1200)).await;

    let PipelineOutcome::Updated(FieldValue::Processed(image)) = outcome else {
        panic!("expected processed value, got {:?}", outcome);
    };
    assert_eq!(image.variants().len(), 3);
    assert_eq!(image.original_url(), image.original().url);

    let thumb = image.variant(VariantTag::Thumbnail).unwrap();
    assert!(thumb.width <= 200 && thumb.height <= 200);
    let mobile = image.variant(VariantTag::Mobile).unwrap();
    assert_eq!((mobile.width, mobile.height), (640, 480));

    for variant in image.variants().values() {
        assert!(variant.storage_path.starts_with("event-hackfest-"));
        assert!(variant.url.starts_with("https://cdn.test/storage/images/"));
    }
    assert_eq!(storage.len().await, 3);

    assert_eq!(
        controller.state(),
        PipelineState::HasValue(FieldValue::Processed(image.clone()))
    );
    assert_eq!(
        listener.changes(),
        vec![(image.original_url().to_string(), true)]
    );
}

#[tokio::test]
async fn test_unsupported_type_never_reaches_storage() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("p"), storage.clone());

    for mime in ["image/bmp", "application/pdf", "text/plain"] {
        let outcome = controller
            .select_file(RawInput::new(vec![0u8; 128], mime))
            .await;
        assert!(matches!(
            outcome,
            PipelineOutcome::Rejected(PipelineError::Validation(
                ValidationError::UnsupportedType { .. }
            ))
        ));
    }

    assert_eq!(storage.put_calls(), 0);
    assert!(matches!(
        controller.state(),
        PipelineState::Error {
            code: "UNSUPPORTED_TYPE",
            ..
        }
    ));
    assert!(controller.value().is_none());
}

#[tokio::test]
async fn test_oversized_input_is_too_large_whatever_the_type() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let settings = PipelineSettings {
        max_file_size_bytes: 1024,
        ..PipelineSettings::default()
    };
    let controller = PipelineController::new(
        field("p"),
        PipelineComponents::new(storage.clone(), &settings),
        Arc::new(imgslot_core::NoOpFieldListener),
    );
    controller.set_alt_text("Team photo");

    for mime in ["image/png", "video/mp4"] {
        let outcome = controller
            .select_file(RawInput::new(vec![0u8; 2048], mime))
            .await;
        assert_eq!(
            outcome,
            PipelineOutcome::Rejected(
                ValidationError::TooLarge {
                    size: 2048,
                    max: 1024
                }
                .into()
            )
        );
    }
    assert_eq!(storage.put_calls(), 0);
}

#[tokio::test]
async fn test_missing_alt_text_blocks_all_work() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("p"), storage.clone());
    controller.set_alt_text("   ");

    let outcome = controller.select_file(png_input(64, 64)).await;

    assert_eq!(
        outcome,
        PipelineOutcome::Rejected(ValidationError::MissingAltText.into())
    );
    assert_eq!(storage.put_calls(), 0);

    controller.dismiss_error();
    assert_eq!(controller.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_corrupt_image_fails_with_processing_error() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("p"), storage.clone());

    let outcome = controller
        .select_file(RawInput::new(b"\xFF\xD8\xFF garbage".to_vec(), "image/jpeg"))
        .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Failed(PipelineError::Processing(ProcessingError::DecodeFailed(_)))
    ));
    assert_eq!(
        controller.state(),
        PipelineState::Error {
            code: "DECODE_FAILED",
            message: "Could not process image, try a different file".to_string(),
        }
    );
    assert_eq!(storage.put_calls(), 0);
}

#[tokio::test]
async fn test_upload_then_remove_leaves_no_objects() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, listener) = setup_controller(field("event-hackfest"), storage.clone());

    assert!(controller.select_file(png_input(900, 300)).await.is_success());
    assert_eq!(storage.len().await, 3);

    assert_eq!(controller.remove().await, PipelineOutcome::Removed);
    assert!(storage.is_empty().await);
    assert_eq!(controller.state(), PipelineState::Idle);
    assert_eq!(listener.changes().last(), Some(&(String::new(), false)));
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("p"), storage);
    let mut rx = controller.subscribe();

    let watcher = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            match state {
                PipelineState::Uploading { progress } => seen.push(progress),
                PipelineState::HasValue(_) => break,
                _ => {}
            }
        }
        seen
    });

    assert!(controller.select_file(png_input(400, 400)).await.is_success());
    let seen = watcher.await.unwrap();

    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{:?}", seen);
    assert!(seen.iter().all(|p| *p <= 100));
}

#[tokio::test]
async fn test_storage_failure_surfaces_generic_error() {
    let storage = Arc::new(FailingStorage::new(1, false));
    let (controller, listener) = setup_controller(field("p"), storage.clone());

    let outcome = controller.select_file(png_input(300, 200)).await;

    let Some(PipelineError::Upload(err)) = outcome.error() else {
        panic!("expected upload error, got {:?}", outcome);
    };
    assert_eq!(err.completed_tags(), &[VariantTag::Original]);
    assert!(matches!(err, UploadError::PartialFailure { .. }));

    // the stored original is left behind
    assert_eq!(storage.inner.len().await, 1);
    assert_eq!(storage.put_attempts(), 2);
    assert!(matches!(
        controller.state(),
        PipelineState::Error {
            code: "PARTIAL_FAILURE",
            ..
        }
    ));
    assert!(listener.changes().is_empty());
    assert!(listener
        .events()
        .contains(&ListenerEvent::Outcome { success: false }));
}

#[tokio::test]
async fn test_failed_deletion_still_clears_field() {
    let storage = Arc::new(FailingStorage::new(usize::MAX, true));
    let (controller, _listener) = setup_controller(field("p"), storage.clone());

    assert!(controller.select_file(png_input(120, 120)).await.is_success());
    assert_eq!(controller.remove().await, PipelineOutcome::Removed);

    assert_eq!(controller.state(), PipelineState::Idle);
    assert!(controller.value().is_none());
    assert_eq!(storage.inner.len().await, 3);
}

#[tokio::test]
async fn test_replace_does_not_delete_previous_value() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("p"), storage.clone());

    let first = controller.select_file(png_input(200, 200)).await;
    let second = controller.replace(png_input(300, 150)).await;

    assert!(first.is_success() && second.is_success());
    assert_ne!(first, second);
    assert_eq!(storage.len().await, 6);
    assert_eq!(storage.remove_calls(), 0);

    let PipelineOutcome::Updated(value) = second else {
        unreachable!()
    };
    assert_eq!(controller.value(), Some(value));
}

#[tokio::test]
async fn test_svg_is_stored_as_sole_original() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("logo"), storage.clone());
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 32"></svg>"#;

    let outcome = controller
        .select_file(RawInput::new(svg.to_vec(), "image/svg+xml"))
        .await;

    let PipelineOutcome::Updated(FieldValue::Processed(image)) = outcome else {
        panic!("expected processed value");
    };
    assert_eq!(image.variants().len(), 1);
    assert!(image.original().storage_path.ends_with(".svg"));
    assert_eq!((image.original().width, image.original().height), (64, 32));

    let stored = storage.get(&image.original().storage_path).await.unwrap();
    assert_eq!(stored.data.as_ref(), svg.as_slice());
    assert_eq!(stored.content_type, "image/svg+xml");

    controller.remove().await;
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn test_charset_qualified_svg_is_stored_as_original() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("logo"), storage.clone());
    let svg = br#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="48" height="24"></svg>"#;

    let outcome = controller
        .select_file(RawInput::new(svg.to_vec(), "image/svg+xml; charset=utf-8"))
        .await;

    let PipelineOutcome::Updated(FieldValue::Processed(image)) = outcome else {
        panic!("expected processed value, got {:?}", outcome);
    };
    assert_eq!(image.variants().len(), 1);
    assert!(image.original().storage_path.ends_with(".svg"));
    assert_eq!((image.original().width, image.original().height), (48, 24));

    let stored = storage.get(&image.original().storage_path).await.unwrap();
    assert_eq!(stored.content_type, "image/svg+xml");
}

#[tokio::test]
async fn test_svg_declared_binary_is_rejected_before_storage() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("logo"), storage.clone());

    let outcome = controller
        .select_file(RawInput::new(
            b"\x00\x01\x02 MZ <html><script></script></html>".to_vec(),
            "image/svg+xml",
        ))
        .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Failed(PipelineError::Processing(ProcessingError::DecodeFailed(_)))
    ));
    assert!(controller.value().is_none());
    assert_eq!(storage.put_calls(), 0);
}

#[tokio::test]
async fn test_required_field_must_have_value() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let config = FieldConfig::builder("p").required(true).build().unwrap();
    let (controller, _listener) = setup_controller(config, storage);

    assert_eq!(controller.ensure_complete(), Err(ValidationError::Required));
    assert!(matches!(controller.state(), PipelineState::Error { .. }));

    assert!(controller.select_file(png_input(50, 50)).await.is_success());
    assert_eq!(controller.ensure_complete(), Ok(()));
}

#[tokio::test]
async fn test_drag_state() {
    let storage = Arc::new(MemoryStorage::new(BASE_URL));
    let (controller, _listener) = setup_controller(field("p"), storage);

    controller.drag_enter();
    assert_eq!(controller.state(), PipelineState::Dragging);
    controller.drag_leave();
    assert_eq!(controller.state(), PipelineState::Idle);

    controller.drag_enter();
    assert!(controller.select_file(png_input(40, 40)).await.is_success());
    assert!(controller.state().value().is_some());
}
