use egui::Pos2;

use super::{BuildContext, ShapeTool};
use crate::element::{Element, factory};
use crate::error::RenderError;
use crate::history::ActionKind;

/// Drags shorter than this leave nothing behind.
pub const MIN_ARROW_LENGTH: f32 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrowTool;

impl ShapeTool for ArrowTool {
    fn name(&self) -> &'static str {
        "Arrow"
    }

    fn action(&self) -> ActionKind {
        ActionKind::Arrow
    }

    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool {
        anchor.distance(current) > MIN_ARROW_LENGTH
    }

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError> {
        Ok(factory::create_arrow(anchor, current, ctx.style.color))
    }
}
