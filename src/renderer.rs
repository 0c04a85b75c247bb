//! Scene rasterization.
//!
//! The editor only needs pixels for thumbnails, magnifier snapshots,
//! background-removal input and export, so the renderer is a trait the host
//! can back with its real canvas. [`SoftwareRenderer`] is the built-in
//! fallback: it draws every element kind except text glyphs, and ignores
//! rotation.
use egui::{Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage, imageops};
use log::warn;

use crate::element::arrow::ArrowGeometry;
use crate::element::{Element, ElementId, ElementKind};
use crate::error::RenderError;
use crate::raster::decode_rgba;
use crate::scene::Scene;

/// What to rasterize: a scene-space region (whole canvas when `None`) at a
/// pixel-per-unit scale, optionally leaving one element out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub region: Option<Rect>,
    pub scale: f32,
    pub exclude: Option<ElementId>,
}

impl RenderRequest {
    pub fn full(scale: f32) -> Self {
        Self {
            region: None,
            scale,
            exclude: None,
        }
    }

    pub fn region(region: Rect, scale: f32) -> Self {
        Self {
            region: Some(region),
            scale,
            exclude: None,
        }
    }

    pub fn excluding(mut self, id: Option<ElementId>) -> Self {
        self.exclude = id;
        self
    }
}

pub trait SceneRenderer {
    fn render(&self, scene: &Scene, request: &RenderRequest) -> Result<RgbaImage, RenderError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRenderer;

impl SceneRenderer for SoftwareRenderer {
    fn render(&self, scene: &Scene, request: &RenderRequest) -> Result<RgbaImage, RenderError> {
        let region = request.region.unwrap_or_else(|| scene.rect());
        if region.width() <= 0.0 || region.height() <= 0.0 || request.scale <= 0.0 {
            return Err(RenderError::EmptyRegion);
        }

        let width = (region.width() * request.scale).round().max(1.0) as u32;
        let height = (region.height() * request.scale).round().max(1.0) as u32;
        let mut canvas = RgbaImage::from_pixel(width, height, rgba(scene.background()));
        let view = Viewport {
            origin: region.min,
            scale: request.scale,
        };

        for element in scene
            .elements()
            .iter()
            .filter(|element| !element.temporary && Some(element.id) != request.exclude)
        {
            if let Err(err) = paint_element(&mut canvas, &view, element) {
                // One undecodable image shouldn't blank the whole render
                warn!("Skipping {} {} while rendering: {}", element.kind.name(), element.id, err);
            }
        }

        Ok(canvas)
    }
}

struct Viewport {
    origin: Pos2,
    scale: f32,
}

impl Viewport {
    fn to_pixel(&self, p: Pos2) -> Vec2 {
        (p - self.origin) * self.scale
    }

    fn to_scene(&self, x: u32, y: u32) -> Pos2 {
        self.origin + Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / self.scale
    }

    /// Pixel range covered by a scene-space rectangle, clamped to the canvas.
    fn pixel_span(&self, rect: Rect, canvas: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        let min = self.to_pixel(rect.min);
        let max = self.to_pixel(rect.max);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(canvas.width());
        let y1 = (max.y.ceil().max(0.0) as u32).min(canvas.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

fn rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

fn blend(pixel: &mut Rgba<u8>, src: Rgba<u8>, opacity: f32) {
    let alpha = (src.0[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = pixel.0[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for channel in 0..3 {
        let src_c = src.0[channel] as f32;
        let dst_c = pixel.0[channel] as f32;
        let mixed = (src_c * alpha + dst_c * dst_alpha * (1.0 - alpha)) / out_alpha.max(f32::EPSILON);
        pixel.0[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    pixel.0[3] = (out_alpha * 255.0).round() as u8;
}

/// Blend `color` into every pixel in `bounds` whose center satisfies `inside`.
fn fill_where<F>(
    canvas: &mut RgbaImage,
    view: &Viewport,
    bounds: Rect,
    color: Rgba<u8>,
    opacity: f32,
    inside: F,
) where
    F: Fn(Pos2) -> bool,
{
    let Some((x0, y0, x1, y1)) = view.pixel_span(bounds, canvas) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if inside(view.to_scene(x, y)) {
                blend(canvas.get_pixel_mut(x, y), color, opacity);
            }
        }
    }
}

fn point_in_polygon(p: Pos2, polygon: &[Pos2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn blit(canvas: &mut RgbaImage, view: &Viewport, source: &RgbaImage, rect: Rect, opacity: f32) {
    let target = (rect.size() * view.scale).round();
    if target.x < 1.0 || target.y < 1.0 {
        return;
    }
    let resized = imageops::resize(
        source,
        target.x as u32,
        target.y as u32,
        imageops::FilterType::Triangle,
    );
    let offset = view.to_pixel(rect.min).round();
    for (x, y, src) in resized.enumerate_pixels() {
        let px = offset.x as i64 + x as i64;
        let py = offset.y as i64 + y as i64;
        if px < 0 || py < 0 || px >= canvas.width() as i64 || py >= canvas.height() as i64 {
            continue;
        }
        blend(canvas.get_pixel_mut(px as u32, py as u32), *src, opacity);
    }
}

fn paint_element(
    canvas: &mut RgbaImage,
    view: &Viewport,
    element: &Element,
) -> Result<(), RenderError> {
    let bounds = element.bounds();
    let color = rgba(element.color);
    let opacity = element.opacity;
    let uniform_scale = (element.scale.x + element.scale.y) / 2.0;

    match &element.kind {
        ElementKind::Image(image) => {
            let source = decode_rgba(&image.bytes)?;
            blit(canvas, view, &source, bounds, opacity);
        }
        ElementKind::Text(_) => {
            // Glyphs are the host's job; mark the text box so it is not lost
            fill_where(canvas, view, bounds, color, opacity * 0.25, |_| true);
        }
        ElementKind::Arrow(arrow) => {
            let ArrowGeometry { body, head } = arrow.geometry_at(element.position, element.scale);
            fill_where(canvas, view, bounds, color, opacity, |p| {
                point_in_polygon(p, &body) || point_in_polygon(p, &head)
            });
        }
        ElementKind::Rectangle(rect) => {
            let half = rect.stroke_width * uniform_scale / 2.0;
            let outer = bounds.expand(half);
            let inner = bounds.shrink(half);
            fill_where(canvas, view, outer, color, opacity, |p| {
                !(inner.is_positive() && inner.contains(p))
            });
        }
        ElementKind::Circle(circle) => {
            let center = bounds.center();
            let radius = circle.radius * uniform_scale;
            let half = circle.stroke_width * uniform_scale / 2.0;
            fill_where(canvas, view, bounds.expand(half), color, opacity, |p| {
                (p.distance(center) - radius).abs() <= half
            });
        }
        ElementKind::BlurRegion(blur) => {
            let tile = blur.tile_size * element.scale;
            let Some((x0, y0, x1, y1)) = view.pixel_span(bounds, canvas) else {
                return Ok(());
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    let local = view.to_scene(x, y) - element.position;
                    if local.x < 0.0 || local.y < 0.0 {
                        continue;
                    }
                    let column = (local.x / tile.x) as u32;
                    let row = (local.y / tile.y) as u32;
                    if let Some(grey) = blur.tile(column, row) {
                        blend(canvas.get_pixel_mut(x, y), Rgba([grey, grey, grey, 255]), opacity);
                    }
                }
            }
        }
        ElementKind::NumberedAnnotation(annotation) => {
            let center = bounds.center();
            let radius = annotation.radius * uniform_scale;
            fill_where(canvas, view, bounds, color, opacity, |p| p.distance(center) <= radius);
        }
        ElementKind::Magnifier(magnifier) => {
            let center = bounds.center();
            let inner = magnifier.inner_radius() * uniform_scale;
            let source = decode_rgba(&magnifier.snapshot)?;
            let lens = Rect::from_center_size(center, Vec2::splat(inner * 2.0));
            blit(canvas, view, &source, lens, opacity);

            let outer = magnifier.radius * uniform_scale;
            fill_where(canvas, view, bounds, color, opacity, |p| {
                let d = p.distance(center);
                d >= inner && d <= outer
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;

    #[test]
    fn renders_background_and_rectangle_outline() {
        let mut scene = Scene::new(40, 40, Color32::WHITE);
        scene.add(factory::create_rectangle(
            Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::splat(20.0)),
            2.0,
            0.0,
            Color32::RED,
        ));

        let image = SoftwareRenderer.render(&scene, &RenderRequest::full(1.0)).unwrap();
        assert_eq!(image.dimensions(), (40, 40));
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(10, 20).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(20, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn region_requests_are_scaled() {
        let scene = Scene::new(100, 100, Color32::BLACK);
        let request = RenderRequest::region(Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0)), 3.0);
        let image = SoftwareRenderer.render(&scene, &request).unwrap();
        assert_eq!(image.dimensions(), (30, 30));
    }

    #[test]
    fn empty_region_is_an_error() {
        let scene = Scene::new(100, 100, Color32::BLACK);
        let request = RenderRequest::region(Rect::from_min_size(Pos2::ZERO, Vec2::ZERO), 1.0);
        assert!(matches!(
            SoftwareRenderer.render(&scene, &request),
            Err(RenderError::EmptyRegion)
        ));
    }
}
