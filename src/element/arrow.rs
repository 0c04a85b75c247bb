use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{calculate_bounds, direction};

/// Length of the triangular head along the arrow direction.
pub const HEAD_LENGTH: f32 = 24.0;
/// Full width of the head at its base.
pub const HEAD_WIDTH: f32 = 22.0;
/// Body width at the tail.
pub const TAIL_WIDTH: f32 = 2.0;
/// Body width where the head begins.
pub const NECK_WIDTH: f32 = 8.0;

/// Absolute outline of an arrow: tapered body quad plus head triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    pub body: [Pos2; 4],
    pub head: [Pos2; 3],
}

impl ArrowGeometry {
    pub fn points(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.body.iter().chain(self.head.iter()).copied()
    }
}

/// Build the outline for an arrow pointing from `tail` to `tip`.
///
/// The body ends `HEAD_LENGTH` before the tip, where the head's base sits.
pub fn arrow_geometry(tail: Pos2, tip: Pos2) -> ArrowGeometry {
    let dir = direction(tail, tip);
    let normal = Vec2::new(-dir.y, dir.x);
    let neck = tip - dir * HEAD_LENGTH;

    let tail_half = normal * (TAIL_WIDTH / 2.0);
    let neck_half = normal * (NECK_WIDTH / 2.0);
    let head_half = normal * (HEAD_WIDTH / 2.0);

    ArrowGeometry {
        body: [tail + tail_half, neck + neck_half, neck - neck_half, tail - tail_half],
        head: [tip, neck + head_half, neck - head_half],
    }
}

/// Arrow payload. Points are stored relative to the element position (the
/// top-left of the outline's bounding box), so moving the element is a
/// position change only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowData {
    pub tail: Vec2,
    pub tip: Vec2,
    pub body: [Vec2; 4],
    pub head: [Vec2; 3],
}

impl ArrowData {
    /// Returns the element position together with the relative payload.
    pub fn from_points(tail: Pos2, tip: Pos2) -> (Pos2, Self) {
        let geometry = arrow_geometry(tail, tip);
        let points: Vec<Pos2> = geometry.points().collect();
        let origin = calculate_bounds(&points, 0.0).min;
        let rel = |p: Pos2| p - origin;

        let data = Self {
            tail: rel(tail),
            tip: rel(tip),
            body: geometry.body.map(rel),
            head: geometry.head.map(rel),
        };
        (origin, data)
    }

    pub fn size(&self) -> Vec2 {
        let points: Vec<Pos2> = self
            .body
            .iter()
            .chain(self.head.iter())
            .map(|v| v.to_pos2())
            .collect();
        calculate_bounds(&points, 0.0).max.to_vec2()
    }

    /// Outline in scene coordinates for an element at `origin` with `scale`.
    pub fn geometry_at(&self, origin: Pos2, scale: Vec2) -> ArrowGeometry {
        let place = |v: Vec2| origin + v * scale;
        ArrowGeometry {
            body: self.body.map(place),
            head: self.head.map(place),
        }
    }
}
