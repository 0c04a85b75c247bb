use log::debug;

use super::Editor;
use crate::element::ElementId;
use crate::history::ActionKind;
use crate::layer::{self, LayerDescriptor, LayerOp, REORDER_DESCRIPTION};

impl Editor {
    /// Layer rows, topmost first.
    pub fn layers(&self) -> Vec<LayerDescriptor> {
        layer::list(&self.scene)
    }

    fn layer_id(&self, display_index: usize) -> Option<ElementId> {
        let layers = self.layers();
        layers.get(display_index).map(|layer| layer.id)
    }

    pub fn select_layer(&mut self, display_index: usize) -> bool {
        self.sync_events();
        let Some(id) = self.layer_id(display_index) else {
            return false;
        };
        self.scene.set_active(Some(id));
        self.sync_events();
        true
    }

    pub fn delete_layer(&mut self, display_index: usize) -> bool {
        self.settle();
        let Some(id) = self.layer_id(display_index) else {
            return false;
        };
        self.scene.remove(id);
        self.sync_events();
        true
    }

    /// Reorder the selection. No selection, or nowhere to move, is a no-op.
    pub fn apply_layer_op(&mut self, op: LayerOp) -> bool {
        self.sync_events();
        let Some(id) = self.scene.active() else {
            return false;
        };
        if !op.apply(&mut self.scene, id) {
            debug!("{:?} left {} where it was", op, id);
            return false;
        }

        // Reselect so the host redraws the selection handles
        self.scene.discard_active();
        self.scene.set_active(Some(id));
        self.sync_events();
        self.commit(ActionKind::Layer, Some(op.description()));
        true
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.apply_layer_op(LayerOp::BringToFront)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.apply_layer_op(LayerOp::SendToBack)
    }

    pub fn bring_forward(&mut self) -> bool {
        self.apply_layer_op(LayerOp::BringForward)
    }

    pub fn send_backwards(&mut self) -> bool {
        self.apply_layer_op(LayerOp::SendBackwards)
    }

    /// Drag-and-drop reorder in the layer panel, both indices topmost first.
    pub fn reorder_layers(&mut self, from_display: usize, to_display: usize) -> bool {
        self.sync_events();
        let layers = self.layers();
        let len = layers.len();
        let (Some(from), Some(to)) = (
            layer::to_paint_index(from_display, len),
            layer::to_paint_index(to_display, len),
        ) else {
            return false;
        };
        if from == to {
            return false;
        }

        let id = layers[from_display].id;
        let Some(target) = layers.get(to_display).and_then(|layer| self.scene.index_of(layer.id))
        else {
            return false;
        };
        debug!("Moving layer {} from paint index {} to {}", id, from, to);
        self.scene.move_to(id, target);
        self.commit(ActionKind::Layer, Some(REORDER_DESCRIPTION));
        true
    }
}
