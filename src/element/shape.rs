use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Stroked, unfilled rectangle with rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleData {
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
    pub corner_radius: f32,
}

impl RectangleData {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Stroked, unfilled circle. The element position is the top-left of its
/// bounding square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleData {
    pub radius: f32,
    pub stroke_width: f32,
}

impl CircleData {
    pub fn size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
}

/// Filled disc with a sequence number drawn on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationData {
    pub number: u32,
    pub radius: f32,
}

impl AnnotationData {
    pub fn label(&self) -> String {
        self.number.to_string()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
}
