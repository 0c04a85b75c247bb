use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;
pub mod arrow;
pub mod blur;
pub mod image;
pub mod magnifier;
pub mod shape;
pub mod text;

pub use arrow::ArrowData;
pub use blur::BlurData;
pub use common::MIN_ELEMENT_SIZE;
pub use self::image::ImageData;
pub use magnifier::MagnifierData;
pub use shape::{AnnotationData, CircleData, RectangleData};
pub use text::TextData;

pub(crate) use common::drag_rect;

/// Stable identity of a scene element. Survives snapshot round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of drawable kinds with their kind-specific payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Image(ImageData),
    Text(TextData),
    Arrow(ArrowData),
    Rectangle(RectangleData),
    Circle(CircleData),
    BlurRegion(BlurData),
    NumberedAnnotation(AnnotationData),
    Magnifier(MagnifierData),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Image(_) => "image",
            ElementKind::Text(_) => "text",
            ElementKind::Arrow(_) => "arrow",
            ElementKind::Rectangle(_) => "rectangle",
            ElementKind::Circle(_) => "circle",
            ElementKind::BlurRegion(_) => "blur",
            ElementKind::NumberedAnnotation(_) => "annotation",
            ElementKind::Magnifier(_) => "magnifier",
        }
    }

    /// Unscaled size of the payload.
    pub fn base_size(&self) -> Vec2 {
        match self {
            ElementKind::Image(image) => Vec2::new(image.width as f32, image.height as f32),
            ElementKind::Text(text) => text.size(),
            ElementKind::Arrow(arrow) => arrow.size(),
            ElementKind::Rectangle(rect) => rect.size(),
            ElementKind::Circle(circle) => circle.size(),
            ElementKind::BlurRegion(blur) => blur.size(),
            ElementKind::NumberedAnnotation(annotation) => annotation.size(),
            ElementKind::Magnifier(magnifier) => magnifier.size(),
        }
    }

    /// Composite kinds are made of several primitives in the scene library.
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            ElementKind::Arrow(_) | ElementKind::BlurRegion(_) | ElementKind::Magnifier(_)
        )
    }
}

fn unit_scale() -> Vec2 {
    Vec2::splat(1.0)
}

fn fully_opaque() -> f32 {
    1.0
}

/// One visual element of the scene.
///
/// `position` is the top-left corner of the unrotated bounding box.
/// `temporary` marks drag previews; it is never serialized, and temporary
/// elements are filtered out of snapshots altogether.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub position: Pos2,
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "fully_opaque")]
    pub opacity: f32,
    pub color: Color32,
    pub selectable: bool,
    pub evented: bool,
    #[serde(skip)]
    pub temporary: bool,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(kind: ElementKind, position: Pos2, color: Color32) -> Self {
        Self {
            id: ElementId::new(),
            position,
            scale: unit_scale(),
            rotation: 0.0,
            opacity: 1.0,
            color,
            selectable: true,
            evented: true,
            temporary: false,
            kind,
        }
    }

    /// Turn this element into a non-interactive drag preview.
    pub fn into_preview(mut self, opacity: f32) -> Self {
        self.temporary = true;
        self.selectable = false;
        self.evented = false;
        self.opacity = opacity;
        self
    }

    pub fn size(&self) -> Vec2 {
        self.kind.base_size() * self.scale
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }

    pub fn center(&self) -> Pos2 {
        self.bounds().center()
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.bounds().contains(pos)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Multiply the current scale, keeping the element at least
    /// `MIN_ELEMENT_SIZE` wide and tall.
    pub fn scale_by(&mut self, factor: Vec2) {
        let base = self.kind.base_size();
        let min_x = if base.x > 0.0 { MIN_ELEMENT_SIZE / base.x } else { 0.0 };
        let min_y = if base.y > 0.0 { MIN_ELEMENT_SIZE / base.y } else { 0.0 };
        self.scale = Vec2::new(
            (self.scale.x * factor.x).max(min_x),
            (self.scale.y * factor.y).max(min_y),
        );
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    /// A copy with a fresh identity, shifted by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::new();
        copy.position += offset;
        copy.temporary = false;
        copy
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotationData> {
        match &self.kind {
            ElementKind::NumberedAnnotation(annotation) => Some(annotation),
            _ => None,
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn create_image(data: ImageData, position: Pos2, scale: f32) -> Element {
        let mut element = Element::new(ElementKind::Image(data), position, Color32::WHITE);
        element.scale = Vec2::splat(scale);
        element
    }

    pub fn create_text(content: &str, position: Pos2, font_size: f32, color: Color32) -> Element {
        Element::new(
            ElementKind::Text(TextData::new(content, font_size)),
            position,
            color,
        )
    }

    pub fn create_rectangle(
        rect: Rect,
        stroke_width: f32,
        corner_radius: f32,
        color: Color32,
    ) -> Element {
        Element::new(
            ElementKind::Rectangle(RectangleData {
                width: rect.width(),
                height: rect.height(),
                stroke_width,
                corner_radius,
            }),
            rect.min,
            color,
        )
    }

    pub fn create_circle(center: Pos2, radius: f32, stroke_width: f32, color: Color32) -> Element {
        Element::new(
            ElementKind::Circle(CircleData {
                radius,
                stroke_width,
            }),
            center - Vec2::splat(radius),
            color,
        )
    }

    pub fn create_arrow(tail: Pos2, tip: Pos2, color: Color32) -> Element {
        let (origin, data) = ArrowData::from_points(tail, tip);
        Element::new(ElementKind::Arrow(data), origin, color)
    }

    pub fn create_blur(rect: Rect, data: BlurData) -> Element {
        Element::new(ElementKind::BlurRegion(data), rect.min, Color32::GRAY)
    }

    pub fn create_annotation(number: u32, position: Pos2, radius: f32, color: Color32) -> Element {
        Element::new(
            ElementKind::NumberedAnnotation(AnnotationData { number, radius }),
            position,
            color,
        )
    }

    pub fn create_magnifier(center: Pos2, data: MagnifierData, color: Color32) -> Element {
        let radius = data.radius;
        Element::new(
            ElementKind::Magnifier(data),
            center - Vec2::splat(radius),
            color,
        )
    }
}
