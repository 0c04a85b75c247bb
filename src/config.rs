use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// Tunables for the editing engine.
///
/// Every group falls back to its defaults when missing, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    pub history: HistoryConfig,
    pub autosave: AutosaveConfig,
    pub placement: PlacementConfig,
    pub style: ToolStyle,
    pub annotation: AnnotationConfig,
    pub removal: RemovalConfig,
    /// Seed for the blur tile generator. Taken from the clock when absent.
    pub seed: Option<u64>,
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color32::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept; the oldest are evicted first.
    pub limit: usize,
    pub create_debounce_ms: u64,
    pub modify_debounce_ms: u64,
    /// Entries that are not image/clear/background get a thumbnail every N entries.
    pub thumbnail_interval: usize,
    pub thumbnail_width: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: 50,
            create_debounce_ms: 300,
            modify_debounce_ms: 300,
            thumbnail_interval: 5,
            thumbnail_width: 160,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub enabled: bool,
    pub delay_ms: u64,
    pub key: String,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 2000,
            key: "annotation-canvas-autosave".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Spacing between placed images and from the canvas edge.
    pub gap: f32,
    /// Extra room kept past the right/bottom edge when the canvas grows.
    pub padding: f32,
    /// Largest share of the canvas a freshly added image may cover per axis.
    pub max_fraction: f32,
    /// Correction applied when the host shows the canvas scaled at a
    /// responsive breakpoint. 1.0 everywhere else.
    pub visual_scale: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 20.0,
            padding: 20.0,
            max_fraction: 0.8,
            visual_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolStyle {
    pub color: Color32,
    pub stroke_width: f32,
    pub font_size: f32,
    /// Opacity of the drag preview.
    pub preview_opacity: f32,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(0xff, 0x3b, 0x30),
            stroke_width: 4.0,
            font_size: 24.0,
            preview_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub position: Pos2,
    pub radius: f32,
    pub duplicate_offset: f32,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            position: Pos2::new(50.0, 50.0),
            radius: 18.0,
            duplicate_offset: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// How long a background-removal error stays visible before it clears.
    pub error_display_ms: u64,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            error_display_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{ "history": { "limit": 10 }, "seed": 7 }"#).unwrap();
        assert_eq!(config.history.limit, 10);
        assert_eq!(config.history.create_debounce_ms, 300);
        assert_eq!(config.canvas, CanvasConfig::default());
        assert_eq!(config.seed, Some(7));
    }
}
