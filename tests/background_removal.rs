mod common;

use std::cell::Cell;

use annotation_canvas::background::SERVICE_FAILURE_MESSAGE;
use annotation_canvas::{
    BackgroundRemovalError, BackgroundRemovalService, ElementId, ElementKind, RemovalProgress,
    ServiceError, ToolMode,
};
use common::{Harness, harness, png};
use egui::Pos2;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;

/// Returns a canned result and counts how often it was asked.
struct FakeService {
    calls: Cell<usize>,
    result: Result<Vec<u8>, ServiceError>,
}

impl FakeService {
    fn succeeding() -> Self {
        Self {
            calls: Cell::new(0),
            result: Ok(png(100, 100, [0, 0, 0, 0])),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: Cell::new(0),
            result: Err(ServiceError::new(message)),
        }
    }
}

impl BackgroundRemovalService for FakeService {
    fn remove_background<'a>(
        &'a self,
        png: Vec<u8>,
        progress: &'a mut dyn FnMut(RemovalProgress),
    ) -> LocalBoxFuture<'a, Result<Vec<u8>, ServiceError>> {
        self.calls.set(self.calls.get() + 1);
        Box::pin(async move {
            assert!(!png.is_empty());
            progress(RemovalProgress {
                stage: "inference".to_owned(),
                current: 1,
                total: 1,
            });
            self.result.clone()
        })
    }
}

/// One selected 100x100 image, already committed.
fn with_selected_image() -> (Harness, ElementId) {
    let mut h = harness();
    let id = h.editor.add_image(png(100, 100, [255, 0, 0, 255])).unwrap();
    h.advance(300);
    assert!(h.editor.select_layer(0));
    (h, id)
}

#[test]
fn test_background_removal_replaces_image() {
    let (mut h, original) = with_selected_image();
    let service = FakeService::succeeding();
    let mut stages = Vec::new();

    let replacement = block_on(
        h.editor
            .remove_background(&service, &mut |progress| stages.push(progress.stage)),
    )
    .unwrap();

    assert_eq!(service.calls.get(), 1);
    assert_eq!(stages, vec!["inference"]);
    assert_ne!(replacement, original);
    assert!(!h.editor.is_removing_background());
    assert!(h.editor.removal_error().is_none());

    let scene = h.editor.scene();
    assert_eq!(scene.len(), 1);
    assert!(scene.get(original).is_none());
    let element = scene.get(replacement).unwrap();
    assert_eq!(element.position, Pos2::new(20.0, 20.0));
    assert!(matches!(element.kind, ElementKind::Image(_)));
    assert_eq!(scene.active(), Some(replacement));

    h.advance(300);
    assert_eq!(
        h.labels(),
        vec![
            "Initial state",
            "Added an image",
            "Removed an element",
            "Removed an image background",
        ]
    );
}

#[test]
fn test_replacement_keeps_paint_order() {
    let (mut h, original) = with_selected_image();
    h.draw(ToolMode::Rectangle, Pos2::new(300.0, 300.0), Pos2::new(400.0, 400.0));
    h.editor.select_layer(1);
    assert_eq!(h.editor.scene().active(), Some(original));

    let service = FakeService::succeeding();
    let replacement = block_on(h.editor.remove_background(&service, &mut |_| {})).unwrap();
    assert_eq!(h.editor.scene().index_of(replacement), Some(0));
}

#[test]
fn test_service_failure_keeps_original() {
    let (mut h, original) = with_selected_image();
    let before = h.editor.scene().to_json().unwrap();
    let service = FakeService::failing("HTTP 500");

    let err = block_on(h.editor.remove_background(&service, &mut |_| {})).unwrap_err();
    assert_eq!(
        err,
        BackgroundRemovalError::Service {
            detail: "HTTP 500".to_owned()
        }
    );
    assert_eq!(err.to_string(), SERVICE_FAILURE_MESSAGE);
    assert_eq!(h.editor.scene().to_json().unwrap(), before);
    assert_eq!(h.editor.scene().active(), Some(original));
    assert!(!h.editor.is_removing_background());
    assert_eq!(h.editor.removal_error(), Some(&err));

    h.advance(4_999);
    assert!(h.editor.removal_error().is_some());
    h.advance(1);
    assert!(h.editor.removal_error().is_none());
    assert_eq!(h.editor.history().len(), 2);
}

#[test]
fn test_removal_requires_selection() {
    let mut h = harness();
    h.editor.add_image(png(10, 10, [1, 1, 1, 255])).unwrap();
    let service = FakeService::succeeding();

    let err = block_on(h.editor.remove_background(&service, &mut |_| {})).unwrap_err();
    assert_eq!(err, BackgroundRemovalError::NoSelection);
    assert_eq!(err.to_string(), "Please select an image first");
    assert_eq!(service.calls.get(), 0);
    assert_eq!(h.editor.removal_error(), Some(&BackgroundRemovalError::NoSelection));

    h.editor.dismiss_removal_error();
    assert!(h.editor.removal_error().is_none());
}

#[test]
fn test_removal_requires_an_image() {
    let mut h = harness();
    h.draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(90.0, 90.0));
    h.editor.select_layer(0);
    let service = FakeService::succeeding();

    let err = block_on(h.editor.remove_background(&service, &mut |_| {})).unwrap_err();
    assert_eq!(err, BackgroundRemovalError::NotAnImage);
    assert_eq!(service.calls.get(), 0);
}

#[test]
fn test_only_one_removal_at_a_time() {
    let (mut h, original) = with_selected_image();

    let job = h.editor.begin_background_removal().unwrap();
    assert_eq!(job.target, original);
    assert!(h.editor.is_removing_background());

    let err = h.editor.begin_background_removal().unwrap_err();
    assert_eq!(err, BackgroundRemovalError::AlreadyProcessing);
    assert!(h.editor.removal_error().is_none());

    let service = FakeService::succeeding();
    let outcome = block_on(job.run(&service, &mut |_| {}));
    assert!(h.editor.finish_background_removal(outcome).is_ok());
    assert!(h.editor.begin_background_removal().is_ok());
}

#[test]
fn test_editing_continues_while_service_runs() {
    let (mut h, _) = with_selected_image();
    let job = h.editor.begin_background_removal().unwrap();

    let rect = h
        .draw(ToolMode::Rectangle, Pos2::new(300.0, 300.0), Pos2::new(400.0, 400.0))
        .unwrap();

    let service = FakeService::succeeding();
    let outcome = block_on(job.run(&service, &mut |_| {}));
    let replacement = h.editor.finish_background_removal(outcome).unwrap();

    let scene = h.editor.scene();
    assert_eq!(scene.len(), 2);
    assert!(scene.get(rect).is_some());
    assert_eq!(scene.index_of(replacement), Some(0));
}

#[test]
fn test_deleted_target_is_reported() {
    let (mut h, original) = with_selected_image();
    let job = h.editor.begin_background_removal().unwrap();

    assert!(h.editor.delete_selected());
    assert!(h.editor.scene().get(original).is_none());

    let service = FakeService::succeeding();
    let outcome = block_on(job.run(&service, &mut |_| {}));
    let err = h.editor.finish_background_removal(outcome).unwrap_err();
    assert_eq!(err, BackgroundRemovalError::TargetGone);
    assert!(!h.editor.is_removing_background());
    assert!(h.editor.scene().is_empty());
}

#[test]
fn test_abandoned_job_frees_the_slot() {
    let (mut h, original) = with_selected_image();

    let job = h.editor.begin_background_removal().unwrap();
    drop(job);
    assert!(!h.editor.is_removing_background());

    let service = FakeService::succeeding();
    let job = h.editor.begin_background_removal().unwrap();
    let outcome = block_on(job.run(&service, &mut |_| {}));
    assert!(h.editor.is_removing_background());
    drop(outcome);
    assert!(!h.editor.is_removing_background());
    assert!(h.editor.scene().get(original).is_some());
    assert!(h.editor.begin_background_removal().is_ok());
}

#[test]
fn test_removal_finishing_mid_drag_ends_the_drag() {
    let (mut h, original) = with_selected_image();
    let job = h.editor.begin_background_removal().unwrap();

    h.editor.pointer_down(Pos2::new(70.0, 70.0));
    h.editor.pointer_move(Pos2::new(80.0, 70.0));
    assert_eq!(h.editor.scene().get(original).unwrap().opacity, 0.5);

    let service = FakeService::succeeding();
    let outcome = block_on(job.run(&service, &mut |_| {}));
    let replacement = h.editor.finish_background_removal(outcome).unwrap();

    assert!(h.editor.state().is_idle());
    let element = h.editor.scene().get(replacement).unwrap();
    assert_eq!(element.opacity, 1.0);
    assert_eq!(element.position, Pos2::new(30.0, 20.0));
    assert_eq!(h.last_label(), "Removed an element");

    h.advance(300);
    assert_eq!(h.last_label(), "Removed an image background");
    assert!(h.editor.undo());
    assert_eq!(h.editor.scene().len(), 0);
}
