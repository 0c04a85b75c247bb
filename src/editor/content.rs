use egui::{Color32, Rect, Vec2};
use log::{debug, info};

use super::Editor;
use crate::element::{ElementId, ImageData, factory};
use crate::error::EditorResult;
use crate::event::SuspendedTracking;
use crate::history::ActionKind;
use crate::placement::place_image;
use crate::raster::encode_png;
use crate::renderer::RenderRequest;

impl Editor {
    /// Add an encoded image, scaled to fit and placed next to the images
    /// already present. Grows the canvas when needed; the growth is part of
    /// the same "image" commit.
    pub fn add_image(&mut self, bytes: Vec<u8>) -> EditorResult<ElementId> {
        let data = ImageData::from_encoded(bytes)?;
        self.settle();

        let existing: Vec<Rect> = self.scene.images().map(|image| image.bounds()).collect();
        let size = Vec2::new(data.width as f32, data.height as f32);
        let placement = place_image(
            size,
            &existing,
            (self.scene.width(), self.scene.height()),
            &self.config.placement,
        );
        if let Some((width, height)) = placement.grown_canvas {
            info!("Growing canvas to {}x{} for new image", width, height);
            self.scene.set_dimensions(width, height);
        }

        self.last_action = ActionKind::Image;
        let id = self
            .scene
            .add(factory::create_image(data, placement.position, placement.scale));
        self.scene.send_to_back(id);
        self.sync_events();
        debug!(
            "Placed image {} at {:?} (scale {:.3})",
            id, placement.position, placement.scale
        );
        Ok(id)
    }

    /// Remove every element in a single "clear" commit.
    pub fn clear_canvas(&mut self) {
        self.settle();
        self.text_edit = None;
        {
            let mut scene =
                SuspendedTracking::new(&mut self.scene, &mut self.subscription, &self.recorder);
            scene.discard_active();
            scene.clear();
        }
        self.annotations.reset();
        self.commit(ActionKind::Clear, None);
    }

    pub fn set_background(&mut self, color: Color32) {
        self.sync_events();
        if self.scene.background() == color {
            return;
        }
        self.scene.set_background(color);
        self.commit(ActionKind::Background, None);
    }

    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        self.sync_events();
        if (self.scene.width(), self.scene.height()) == (width.max(1), height.max(1)) {
            return;
        }
        self.scene.set_dimensions(width, height);
        self.commit(ActionKind::Resize, None);
    }

    /// Remove the selection. The removal commits immediately.
    pub fn delete_selected(&mut self) -> bool {
        self.settle();
        let Some(id) = self.scene.active() else {
            return false;
        };
        self.scene.remove(id);
        self.sync_events();
        true
    }

    /// Copy the selection at a fixed offset and select the copy. Numbered
    /// annotations get the next sequence number instead of the original's.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        self.settle();
        let original = self.scene.active_element()?.clone();
        let offset = Vec2::splat(self.config.annotation.duplicate_offset);

        let copy = match original.as_annotation() {
            Some(annotation) => {
                let number = self.annotations.take();
                let mut copy = factory::create_annotation(
                    number,
                    original.position + offset,
                    annotation.radius,
                    original.color,
                );
                copy.scale = original.scale;
                copy.rotation = original.rotation;
                copy
            }
            None => original.duplicate(offset),
        };

        self.last_action = ActionKind::Duplicate;
        let id = self.scene.add(copy);
        self.scene.set_active(Some(id));
        self.sync_events();
        Some(id)
    }

    /// The whole canvas as PNG, for the host's clipboard or download.
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        let image = self.renderer.render(&self.scene, &RenderRequest::full(1.0))?;
        Ok(encode_png(&image)?)
    }
}
