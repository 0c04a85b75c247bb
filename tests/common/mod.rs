#![allow(dead_code)]

use annotation_canvas::raster::encode_png;
use annotation_canvas::{Editor, EditorConfig, ElementId, ManualClock, MemoryStorage, ToolMode};
use egui::Pos2;
use image::{Rgba, RgbaImage};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An editor on a manual clock with in-memory autosave.
pub struct Harness {
    pub editor: Editor,
    pub clock: ManualClock,
    pub storage: MemoryStorage,
}

pub fn harness() -> Harness {
    harness_with(EditorConfig::default())
}

pub fn harness_with(mut config: EditorConfig) -> Harness {
    init_logging();
    config.seed.get_or_insert(42);
    let clock = ManualClock::new(1_000);
    let storage = MemoryStorage::new();
    let editor = Editor::builder()
        .config(config)
        .clock(clock.clone())
        .storage(storage.clone())
        .build();
    Harness {
        editor,
        clock,
        storage,
    }
}

impl Harness {
    /// Let `millis` pass and run whatever came due.
    pub fn advance(&mut self, millis: u64) {
        self.clock.advance(millis);
        self.editor.tick();
    }

    pub fn drag(&mut self, from: Pos2, to: Pos2) -> Option<ElementId> {
        self.editor.pointer_down(from);
        self.editor.pointer_move(from.lerp(to, 0.5));
        self.editor.pointer_move(to);
        self.editor.pointer_up(to)
    }

    pub fn draw(&mut self, mode: ToolMode, from: Pos2, to: Pos2) -> Option<ElementId> {
        self.editor.arm_tool(mode);
        self.drag(from, to)
    }

    pub fn labels(&self) -> Vec<String> {
        self.editor
            .history_entries()
            .map(|entry| entry.label.clone())
            .collect()
    }

    pub fn last_label(&self) -> String {
        self.labels().pop().unwrap_or_default()
    }
}

/// A solid-colour PNG.
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba(color))).unwrap()
}
