use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: f32 = 2.0;
pub const RING_WIDTH: f32 = 4.0;

/// Static zoomed copy of the scene region under the lens at creation time.
///
/// `snapshot` is a PNG of the lens interior, already clipped to a circle.
/// It does not follow later changes to the content beneath it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnifierData {
    pub radius: f32,
    pub ring_width: f32,
    pub zoom: f32,
    pub source_center: Pos2,
    pub snapshot: Vec<u8>,
}

impl std::fmt::Debug for MagnifierData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagnifierData")
            .field("radius", &self.radius)
            .field("zoom", &self.zoom)
            .field("source_center", &self.source_center)
            .field("snapshot_len", &self.snapshot.len())
            .finish()
    }
}

impl MagnifierData {
    pub fn inner_radius(&self) -> f32 {
        inner_radius(self.radius, self.ring_width)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
}

pub fn inner_radius(radius: f32, ring_width: f32) -> f32 {
    (radius - ring_width).max(1.0)
}

/// Scene region that gets magnified into a lens of `inner_radius`.
pub fn source_rect(center: Pos2, inner_radius: f32, zoom: f32) -> Rect {
    let half = inner_radius / zoom.max(f32::EPSILON);
    Rect::from_center_size(center, Vec2::splat(half * 2.0))
}
