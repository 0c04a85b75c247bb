mod common;

use annotation_canvas::state::{AutosaveRecord, PersistenceError, PersistenceResult};
use annotation_canvas::{
    ActionKind, Editor, EditorConfig, ManualClock, MemoryStorage, Scene, Storage, Task, ToolMode,
};
use common::{harness, harness_with, init_logging};
use egui::{Color32, Pos2};

const KEY: &str = "annotation-canvas-autosave";

fn reopen(storage: &MemoryStorage) -> Editor {
    init_logging();
    let mut config = EditorConfig::default();
    config.seed = Some(7);
    Editor::builder()
        .config(config)
        .clock(ManualClock::new(50_000))
        .storage(storage.clone())
        .build()
}

fn stored_record(scene: &Scene) -> String {
    serde_json::to_string(&AutosaveRecord::capture(scene, 1)).unwrap()
}

struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get(&self, _key: &str) -> PersistenceResult<Option<String>> {
        Err(PersistenceError::StorageUnavailable("quota exceeded".to_owned()))
    }

    fn set(&self, _key: &str, _value: &str) -> PersistenceResult<()> {
        Err(PersistenceError::StorageUnavailable("quota exceeded".to_owned()))
    }

    fn remove(&self, _key: &str) -> PersistenceResult<()> {
        Ok(())
    }
}

#[test]
fn test_autosave_waits_for_quiet_period() {
    let mut h = harness();
    h.draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0));
    h.advance(300);
    assert!(h.editor.is_task_pending(Task::Autosave));
    assert!(h.storage.is_empty());

    h.advance(1_999);
    assert!(h.storage.is_empty());
    h.advance(1);
    assert_eq!(h.storage.len(), 1);
    assert!(h.storage.get(KEY).unwrap().is_some());
}

#[test]
fn test_autosave_during_drag_keeps_real_opacity() {
    let mut h = harness();
    let id = h
        .draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0))
        .unwrap();
    h.advance(300);

    h.editor.pointer_down(Pos2::new(35.0, 35.0));
    h.editor.pointer_move(Pos2::new(45.0, 35.0));
    h.advance(2_000);
    assert!(h.editor.state().is_modifying());
    assert_eq!(h.editor.scene().get(id).unwrap().opacity, 0.5);

    let json = h.storage.get(KEY).unwrap().unwrap();
    let record: AutosaveRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record.objects.len(), 1);
    assert_eq!(record.objects[0].opacity, 1.0);

    let restored = reopen(&h.storage);
    assert_eq!(restored.scene().get(id).unwrap().opacity, 1.0);
}

#[test]
fn test_autosave_is_restored_on_startup() {
    let mut h = harness();
    h.draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0));
    h.editor.add_numbered_annotation();
    h.advance(300);
    h.advance(2_000);

    let editor = reopen(&h.storage);
    assert_eq!(editor.scene().to_json().unwrap(), h.editor.scene().to_json().unwrap());
    assert_eq!(editor.history().len(), 1);
    let entry = editor.history().current().unwrap();
    assert_eq!(entry.kind, ActionKind::Restored);
    assert_eq!(entry.label, "Restored from autosave");
    assert!(!editor.can_undo());
}

#[test]
fn test_trivial_autosave_starts_fresh() {
    let storage = MemoryStorage::new();
    let blank = Scene::new(800, 600, Color32::WHITE);
    storage.set(KEY, &stored_record(&blank)).unwrap();

    let editor = reopen(&storage);
    assert_eq!(editor.history().current().unwrap().kind, ActionKind::Initial);
    assert!(editor.scene().is_empty());
}

#[test]
fn test_background_only_autosave_is_restored() {
    let storage = MemoryStorage::new();
    let dark = Scene::new(640, 480, Color32::BLACK);
    storage.set(KEY, &stored_record(&dark)).unwrap();

    let editor = reopen(&storage);
    assert_eq!(editor.history().current().unwrap().kind, ActionKind::Restored);
    assert_eq!(editor.scene().background(), Color32::BLACK);
    assert_eq!((editor.scene().width(), editor.scene().height()), (640, 480));
}

#[test]
fn test_corrupt_autosave_is_ignored() {
    let storage = MemoryStorage::new();
    storage.set(KEY, "{\"version\": 1, \"objects\": [").unwrap();

    let editor = reopen(&storage);
    assert_eq!(editor.history().current().unwrap().kind, ActionKind::Initial);
    assert!(editor.scene().is_empty());
}

#[test]
fn test_newer_autosave_version_is_ignored() {
    let storage = MemoryStorage::new();
    let mut record = AutosaveRecord::capture(&Scene::new(800, 600, Color32::BLACK), 1);
    record.version = 99;
    storage.set(KEY, &serde_json::to_string(&record).unwrap()).unwrap();

    let editor = reopen(&storage);
    assert_eq!(editor.history().current().unwrap().kind, ActionKind::Initial);
    assert_eq!(editor.scene().background(), Color32::WHITE);
}

#[test]
fn test_broken_storage_does_not_stop_editing() {
    init_logging();
    let clock = ManualClock::new(0);
    let mut editor = Editor::builder()
        .clock(clock.clone())
        .storage(BrokenStorage)
        .build();
    assert_eq!(editor.history().current().unwrap().kind, ActionKind::Initial);

    editor.add_numbered_annotation();
    clock.advance(300);
    editor.tick();
    clock.advance(2_000);
    editor.tick();

    assert_eq!(editor.history().len(), 2);
    assert!(!editor.is_task_pending(Task::Autosave));
}

#[test]
fn test_disabled_autosave_writes_nothing() {
    let mut config = EditorConfig::default();
    config.autosave.enabled = false;
    let mut h = harness_with(config);

    h.draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0));
    h.advance(300);
    assert!(!h.editor.is_task_pending(Task::Autosave));
    h.advance(5_000);
    h.editor.flush();
    assert!(h.storage.is_empty());
}

#[test]
fn test_flush_commits_and_saves_immediately() {
    let mut h = harness();
    h.draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0));
    assert!(h.storage.is_empty());

    h.editor.flush();
    assert_eq!(h.last_label(), "Added a rectangle");
    assert_eq!(h.storage.len(), 1);
    assert!(h.editor.next_deadline().is_none());

    let editor = reopen(&h.storage);
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_undo_is_autosaved() {
    let mut h = harness();
    h.draw(ToolMode::Rectangle, Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0));
    h.advance(300);
    h.advance(2_000);

    h.editor.undo();
    h.advance(2_000);

    // The undone scene is blank, so there is nothing worth restoring
    let editor = reopen(&h.storage);
    assert_eq!(editor.history().current().unwrap().kind, ActionKind::Initial);
}
