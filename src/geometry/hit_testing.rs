use egui::{Pos2, Rect};

use crate::element::Element;

/// Topmost element under `pos` that accepts pointer events.
///
/// Scans in reverse paint order; previews and non-evented elements are
/// transparent to the pointer.
pub fn topmost_at(elements: &[Element], pos: Pos2) -> Option<&Element> {
    elements
        .iter()
        .rev()
        .filter(|element| element.evented && !element.temporary)
        .find(|element| element.hit_test(pos))
}

/// Strict axis-aligned overlap test. Rectangles that only share an edge do
/// not overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0));
        let b = Rect::from_min_size(Pos2::new(100.0, 0.0), egui::vec2(50.0, 50.0));
        let c = Rect::from_min_size(Pos2::new(99.0, 99.0), egui::vec2(50.0, 50.0));

        assert!(!rects_overlap(a, b));
        assert!(rects_overlap(a, c));
    }
}
