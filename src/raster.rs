use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::RenderError;
use crate::renderer::{RenderRequest, SceneRenderer};
use crate::scene::Scene;

/// Low-resolution PNG preview attached to some history entries.
#[derive(Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Re-encode arbitrary image bytes as PNG.
pub fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    encode_png(&decode_rgba(bytes)?)
}

/// Make every pixel outside the inscribed circle fully transparent.
pub fn clip_to_circle(image: &mut RgbaImage) {
    let (width, height) = image.dimensions();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = cx.min(cy);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy > radius * radius {
            pixel.0[3] = 0;
        }
    }
}

/// Render the whole scene scaled down to `width` pixels wide.
pub fn render_thumbnail(
    renderer: &dyn SceneRenderer,
    scene: &Scene,
    width: u32,
) -> Result<Thumbnail, RenderError> {
    let scale = width as f32 / scene.width().max(1) as f32;
    let image = renderer.render(scene, &RenderRequest::full(scale))?;
    Ok(Thumbnail {
        width: image.width(),
        height: image.height(),
        png: encode_png(&image)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn circle_clip_keeps_center_and_drops_corners() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([10, 20, 30, 255]));
        clip_to_circle(&mut image);

        assert_eq!(image.get_pixel(10, 10).0[3], 255);
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert_eq!(image.get_pixel(19, 19).0[3], 0);
    }

    #[test]
    fn png_round_trip_preserves_dimensions() {
        let image = RgbaImage::from_pixel(7, 3, Rgba([255, 0, 0, 255]));
        let png = encode_png(&image).unwrap();
        let decoded = decode_rgba(&png).unwrap();
        assert_eq!(decoded.dimensions(), (7, 3));
    }
}
