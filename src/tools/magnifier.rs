use egui::Pos2;
use image::imageops;

use super::{BuildContext, ShapeTool};
use crate::element::magnifier::{DEFAULT_ZOOM, RING_WIDTH, inner_radius, source_rect};
use crate::element::{Element, MagnifierData, factory};
use crate::error::RenderError;
use crate::history::ActionKind;
use crate::raster::{clip_to_circle, encode_png};
use crate::renderer::RenderRequest;

pub const MIN_MAGNIFIER_RADIUS: f32 = 30.0;

/// Lens centered on the press point; the drag length is its radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierTool {
    pub zoom: f32,
}

impl Default for MagnifierTool {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

impl MagnifierTool {
    /// Rasterize the magnified region under a lens of `radius` at `center`,
    /// clipped to the lens interior.
    fn capture(
        &self,
        center: Pos2,
        radius: f32,
        ctx: &BuildContext<'_>,
    ) -> Result<Vec<u8>, RenderError> {
        let inner = inner_radius(radius, RING_WIDTH);
        let request =
            RenderRequest::region(source_rect(center, inner, self.zoom), self.zoom).excluding(ctx.exclude);
        let region = ctx.renderer.render(ctx.scene, &request)?;

        let diameter = (inner * 2.0).round().max(1.0) as u32;
        let mut lens = if region.dimensions() == (diameter, diameter) {
            region
        } else {
            imageops::resize(&region, diameter, diameter, imageops::FilterType::Triangle)
        };
        clip_to_circle(&mut lens);
        encode_png(&lens)
    }
}

impl ShapeTool for MagnifierTool {
    fn name(&self) -> &'static str {
        "Magnifier"
    }

    fn action(&self) -> ActionKind {
        ActionKind::Magnifier
    }

    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool {
        anchor.distance(current) > MIN_MAGNIFIER_RADIUS
    }

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError> {
        let radius = anchor.distance(current).max(RING_WIDTH + 1.0);
        let snapshot = self.capture(anchor, radius, ctx)?;
        let data = MagnifierData {
            radius,
            ring_width: RING_WIDTH,
            zoom: self.zoom,
            source_center: anchor,
            snapshot,
        };
        Ok(factory::create_magnifier(anchor, data, ctx.style.color))
    }
}
