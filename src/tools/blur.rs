use egui::Pos2;

use super::{BuildContext, ShapeTool};
use crate::element::{BlurData, Element, drag_rect, factory};
use crate::error::RenderError;
use crate::history::ActionKind;

pub const MIN_BLUR_SIDE: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlurTool;

impl ShapeTool for BlurTool {
    fn name(&self) -> &'static str {
        "Blur"
    }

    fn action(&self) -> ActionKind {
        ActionKind::Blur
    }

    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool {
        let rect = drag_rect(anchor, current);
        rect.width() > MIN_BLUR_SIDE && rect.height() > MIN_BLUR_SIDE
    }

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError> {
        let rect = drag_rect(anchor, current);
        let data = BlurData::generate(rect.width(), rect.height(), &mut *ctx.rng);
        Ok(factory::create_blur(rect, data))
    }
}
