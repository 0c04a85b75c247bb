//! Where a newly added image goes.
//!
//! Images are scaled to fit a share of the canvas, then placed at the
//! top-left-most free spot next to or below the images already present. The
//! canvas grows when the chosen spot runs past its edges.
use egui::{Pos2, Rect, Vec2};

use crate::config::PlacementConfig;
use crate::geometry::rects_overlap;

/// Candidates whose tops differ by less than this count as one row.
pub const ROW_TOLERANCE: f32 = 10.0;

/// Outcome of placing one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Pos2,
    pub scale: f32,
    /// New canvas dimensions when the image would not fit otherwise.
    pub grown_canvas: Option<(u32, u32)>,
}

/// Uniform scale that keeps an image within `max_fraction` of the canvas
/// along both axes. Never enlarges.
pub fn fit_scale(image_size: Vec2, canvas_size: Vec2, config: &PlacementConfig) -> f32 {
    let max_w = canvas_size.x * config.max_fraction * config.visual_scale;
    let max_h = canvas_size.y * config.max_fraction * config.visual_scale;

    let mut scale: f32 = 1.0;
    if image_size.x > 0.0 {
        scale = scale.min(max_w / image_size.x);
    }
    if image_size.y > 0.0 {
        scale = scale.min(max_h / image_size.y);
    }
    scale.max(f32::EPSILON)
}

/// Candidate positions, ordered top-left first.
fn candidates(existing: &[Rect], gap: f32) -> Vec<Pos2> {
    let mut points = vec![Pos2::new(gap, gap)];
    for rect in existing {
        points.push(Pos2::new(rect.max.x + gap, rect.min.y));
        points.push(Pos2::new(gap, rect.max.y + gap));
    }
    points.sort_by(|a, b| a.y.total_cmp(&b.y));

    // Rows are anchored on their first (highest) candidate; within a row the
    // leftmost wins
    let mut ordered = Vec::with_capacity(points.len());
    let mut row: Vec<Pos2> = Vec::new();
    for point in points {
        if let Some(first) = row.first() {
            if point.y - first.y >= ROW_TOLERANCE {
                row.sort_by(|a, b| a.x.total_cmp(&b.x));
                ordered.append(&mut row);
            }
        }
        row.push(point);
    }
    row.sort_by(|a, b| a.x.total_cmp(&b.x));
    ordered.append(&mut row);
    ordered
}

/// Best-fit position for an item of `size` among `existing` image bounds.
///
/// Falls back to a new row below everything when no candidate fits within
/// `canvas_width` without overlapping.
pub fn find_position(size: Vec2, existing: &[Rect], canvas_width: f32, gap: f32) -> Pos2 {
    let fits = |pos: &Pos2| {
        let rect = Rect::from_min_size(*pos, size);
        rect.max.x <= canvas_width && !existing.iter().any(|other| rects_overlap(rect, *other))
    };

    candidates(existing, gap)
        .into_iter()
        .find(fits)
        .unwrap_or_else(|| {
            let bottom = existing
                .iter()
                .map(|rect| rect.max.y)
                .fold(0.0_f32, f32::max);
            Pos2::new(gap, bottom + gap)
        })
}

/// Canvas dimensions needed to hold `rect` plus `padding`, if larger than
/// the current ones.
pub fn grown_canvas(rect: Rect, canvas: (u32, u32), padding: f32) -> Option<(u32, u32)> {
    let (width, height) = canvas;
    let needed_w = rect.max.x + padding;
    let needed_h = rect.max.y + padding;

    if needed_w <= width as f32 && needed_h <= height as f32 {
        return None;
    }
    Some((
        width.max(needed_w.ceil() as u32),
        height.max(needed_h.ceil() as u32),
    ))
}

/// Scale and position an image of natural `image_size`.
pub fn place_image(
    image_size: Vec2,
    existing: &[Rect],
    canvas: (u32, u32),
    config: &PlacementConfig,
) -> Placement {
    let canvas_size = Vec2::new(canvas.0 as f32, canvas.1 as f32);
    let scale = fit_scale(image_size, canvas_size, config);
    let size = image_size * scale;
    let position = find_position(size, existing, canvas_size.x, config.gap);

    Placement {
        position,
        scale,
        grown_canvas: grown_canvas(Rect::from_min_size(position, size), canvas, config.padding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, side: f32) -> Rect {
        Rect::from_min_size(Pos2::new(x, y), Vec2::splat(side))
    }

    #[test]
    fn prefers_the_spot_right_of_an_existing_image() {
        let existing = [square(0.0, 0.0, 100.0)];
        let pos = find_position(Vec2::splat(100.0), &existing, 800.0, 20.0);
        assert_eq!(pos, Pos2::new(120.0, 0.0));
    }

    #[test]
    fn empty_canvas_uses_the_gap_corner() {
        let pos = find_position(Vec2::splat(50.0), &[], 800.0, 20.0);
        assert_eq!(pos, Pos2::new(20.0, 20.0));
    }

    #[test]
    fn too_wide_candidates_fall_through_to_the_row_below() {
        let existing = [square(20.0, 20.0, 300.0)];
        let pos = find_position(Vec2::splat(300.0), &existing, 400.0, 20.0);
        assert_eq!(pos, Pos2::new(20.0, 340.0));
    }

    #[test]
    fn nearby_tops_are_ordered_left_to_right() {
        let ordered = candidates(&[square(200.0, 25.0, 50.0)], 20.0);
        // (20,20) and (270,25) share a row; (20,95) starts the next one
        assert_eq!(
            ordered,
            vec![Pos2::new(20.0, 20.0), Pos2::new(270.0, 25.0), Pos2::new(20.0, 95.0)]
        );
    }

    #[test]
    fn falls_back_below_everything() {
        // Every candidate is either too wide or overlapping
        let existing = [square(0.0, 0.0, 100.0), square(0.0, 120.0, 100.0)];
        let pos = find_position(Vec2::new(500.0, 10.0), &existing, 200.0, 20.0);
        assert_eq!(pos, Pos2::new(20.0, 240.0));
    }

    #[test]
    fn scale_fits_the_canvas_share_and_never_enlarges() {
        let config = PlacementConfig::default();
        let canvas = Vec2::new(800.0, 600.0);

        assert_eq!(fit_scale(Vec2::splat(100.0), canvas, &config), 1.0);
        assert!((fit_scale(Vec2::new(1280.0, 100.0), canvas, &config) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn canvas_grows_to_hold_the_image_plus_padding() {
        assert_eq!(grown_canvas(square(20.0, 20.0, 100.0), (800, 600), 20.0), None);
        assert_eq!(
            grown_canvas(Rect::from_min_size(Pos2::new(700.0, 20.0), Vec2::splat(100.0)), (800, 600), 20.0),
            Some((820, 600))
        );
    }
}
