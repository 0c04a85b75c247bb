use egui::{Pos2, Rect, Vec2};

use super::{BuildContext, ShapeTool};
use crate::element::{Element, drag_rect, factory};
use crate::error::RenderError;
use crate::history::ActionKind;

pub const MIN_RECT_SIDE: f32 = 10.0;
pub const MIN_CIRCLE_RADIUS: f32 = 10.0;
pub const RECT_CORNER_RADIUS: f32 = 8.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RectangleTool;

impl ShapeTool for RectangleTool {
    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn action(&self) -> ActionKind {
        ActionKind::Rectangle
    }

    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool {
        let rect = drag_rect(anchor, current);
        rect.width() > MIN_RECT_SIDE && rect.height() > MIN_RECT_SIDE
    }

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError> {
        Ok(factory::create_rectangle(
            drag_rect(anchor, current),
            ctx.style.stroke_width,
            RECT_CORNER_RADIUS,
            ctx.style.color,
        ))
    }
}

/// Circle inscribed in the drag box's larger side, anchored at the box's
/// top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircleTool;

impl CircleTool {
    pub fn radius(anchor: Pos2, current: Pos2) -> f32 {
        let delta = current - anchor;
        delta.x.abs().max(delta.y.abs()) / 2.0
    }

    fn bounds(anchor: Pos2, current: Pos2) -> Rect {
        let radius = Self::radius(anchor, current);
        let top_left = drag_rect(anchor, current).min;
        Rect::from_min_size(top_left, Vec2::splat(radius * 2.0))
    }
}

impl ShapeTool for CircleTool {
    fn name(&self) -> &'static str {
        "Circle"
    }

    fn action(&self) -> ActionKind {
        ActionKind::Circle
    }

    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool {
        Self::radius(anchor, current) > MIN_CIRCLE_RADIUS
    }

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError> {
        let bounds = Self::bounds(anchor, current);
        Ok(factory::create_circle(
            bounds.center(),
            bounds.width() / 2.0,
            ctx.style.stroke_width,
            ctx.style.color,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_needs_both_sides_past_the_minimum() {
        let tool = RectangleTool;
        let anchor = Pos2::new(100.0, 100.0);
        assert!(!tool.meets_threshold(anchor, Pos2::new(108.0, 108.0)));
        assert!(!tool.meets_threshold(anchor, Pos2::new(150.0, 105.0)));
        assert!(tool.meets_threshold(anchor, Pos2::new(88.0, 88.0)));
    }

    #[test]
    fn circle_sits_in_the_top_left_of_the_drag_box() {
        let bounds = CircleTool::bounds(Pos2::new(100.0, 100.0), Pos2::new(60.0, 130.0));
        assert_eq!(bounds.min, Pos2::new(60.0, 100.0));
        assert_eq!(bounds.width(), 40.0);
        assert!(CircleTool.meets_threshold(Pos2::ZERO, Pos2::new(22.0, 0.0)));
        assert!(!CircleTool.meets_threshold(Pos2::ZERO, Pos2::new(20.0, 20.0)));
    }
}
