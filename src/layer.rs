//! Layer-panel view of the scene.
//!
//! The panel lists elements topmost first, the reverse of paint order. All
//! display indices handed in by a panel go through [`to_paint_index`]
//! before they touch the scene.
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind};
use crate::scene::Scene;

const TEXT_NAME_CHARS: usize = 20;

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub id: ElementId,
    pub kind_label: String,
    pub name: String,
    pub is_selected: bool,
}

/// Z-order commands acting on the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerOp {
    BringToFront,
    SendToBack,
    BringForward,
    SendBackwards,
}

impl LayerOp {
    /// History label for the commit that follows the reorder.
    pub fn description(self) -> &'static str {
        match self {
            LayerOp::BringToFront => "Brought to front",
            LayerOp::SendToBack => "Sent to back",
            LayerOp::BringForward => "Brought forward",
            LayerOp::SendBackwards => "Sent backward",
        }
    }

    pub(crate) fn apply(self, scene: &mut Scene, id: ElementId) -> bool {
        match self {
            LayerOp::BringToFront => scene.bring_to_front(id),
            LayerOp::SendToBack => scene.send_to_back(id),
            LayerOp::BringForward => scene.bring_forward(id),
            LayerOp::SendBackwards => scene.send_backwards(id),
        }
    }
}

pub const REORDER_DESCRIPTION: &str = "Reordered layers";

pub fn kind_label(kind: &ElementKind) -> &'static str {
    match kind {
        ElementKind::Image(_) => "Image",
        ElementKind::Text(_) => "Text",
        ElementKind::Rectangle(_) => "Rectangle",
        ElementKind::Circle(_) => "Circle",
        ElementKind::NumberedAnnotation(_) => "Annotation",
        ElementKind::Arrow(_) | ElementKind::BlurRegion(_) | ElementKind::Magnifier(_) => "Group",
    }
}

pub fn layer_name(element: &Element) -> String {
    match &element.kind {
        ElementKind::Text(text) => {
            let name: String = text.content.chars().take(TEXT_NAME_CHARS).collect();
            if text.content.chars().count() > TEXT_NAME_CHARS {
                format!("{name}...")
            } else {
                name
            }
        }
        ElementKind::Image(_) => "Image".to_owned(),
        ElementKind::Rectangle(_) => "Rectangle".to_owned(),
        ElementKind::Circle(_) => "Circle".to_owned(),
        ElementKind::Arrow(_) => "Arrow".to_owned(),
        ElementKind::BlurRegion(_) => "Blur region".to_owned(),
        ElementKind::Magnifier(_) => "Magnifier".to_owned(),
        ElementKind::NumberedAnnotation(annotation) => format!("Annotation {}", annotation.number),
    }
}

/// Map a topmost-first display index onto the scene's paint order.
pub fn to_paint_index(display_index: usize, len: usize) -> Option<usize> {
    (display_index < len).then(|| len - 1 - display_index)
}

/// Layer rows, topmost first. Drag previews are not layers.
pub fn list(scene: &Scene) -> Vec<LayerDescriptor> {
    let active = scene.active();
    scene
        .elements()
        .iter()
        .rev()
        .filter(|element| !element.temporary)
        .map(|element| LayerDescriptor {
            id: element.id,
            kind_label: kind_label(&element.kind).to_owned(),
            name: layer_name(element),
            is_selected: active == Some(element.id),
        })
        .collect()
}
