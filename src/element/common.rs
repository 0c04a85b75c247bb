use egui::{Pos2, Rect, Vec2};

/// Elements never shrink below this along either axis when scaled.
pub const MIN_ELEMENT_SIZE: f32 = 2.0;

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Normalized rectangle spanned by a drag from `anchor` to `current`.
pub(crate) fn drag_rect(anchor: Pos2, current: Pos2) -> Rect {
    Rect::from_two_pos(anchor, current)
}

/// Unit direction from `from` to `to`, pointing right for coincident points.
pub(crate) fn direction(from: Pos2, to: Pos2) -> Vec2 {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        Vec2::X
    } else {
        delta / length
    }
}
