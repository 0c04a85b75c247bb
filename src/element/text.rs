use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Placeholder shown in a freshly placed text box.
pub const DEFAULT_TEXT: &str = "Type here";

// Rough glyph metrics; real layout belongs to the renderer
const CHAR_WIDTH_EM: f32 = 0.6;
const LINE_HEIGHT_EM: f32 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub content: String,
    pub font_size: f32,
}

impl TextData {
    pub fn new(content: impl Into<String>, font_size: f32) -> Self {
        Self {
            content: content.into(),
            font_size,
        }
    }

    pub fn size(&self) -> Vec2 {
        let lines = self.content.lines().count().max(1);
        let longest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        Vec2::new(
            longest as f32 * self.font_size * CHAR_WIDTH_EM,
            lines as f32 * self.font_size * LINE_HEIGHT_EM,
        )
    }
}
