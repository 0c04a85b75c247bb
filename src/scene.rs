//! The live editable document.
//!
//! A [`Scene`] owns the paint-ordered element list (last = topmost), the
//! canvas dimensions and background, and the active selection. Every
//! structural change is announced on its [`EventBus`]; reordering and
//! selection toggles that the scene library performs silently stay silent.
use egui::{Color32, Pos2, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::error::SceneError;
use crate::event::{EventBus, SceneEvent};
use crate::geometry::topmost_at;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Crosshair,
    Text,
}

/// Serializable description of a scene, minus drag previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub background: Color32,
    pub objects: Vec<Element>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    elements: Vec<Element>,
    background: Color32,
    width: u32,
    height: u32,
    active: Option<ElementId>,
    selection_enabled: bool,
    cursor: CursorStyle,
    events: EventBus,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        Self {
            elements: Vec::new(),
            background,
            width,
            height,
            active: None,
            selection_enabled: true,
            cursor: CursorStyle::Default,
            events: EventBus::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size())
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn set_background(&mut self, color: Color32) {
        self.background = color;
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn images(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|element| element.is_image() && !element.temporary)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Mutable access without a modification event, for presentation-only
    /// tweaks such as the drag opacity flicker.
    pub(crate) fn get_mut_silent(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id == id)
    }

    pub fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(Element::bounds)
    }

    /// Add on top of the paint order.
    pub fn add(&mut self, element: Element) -> ElementId {
        let index = self.elements.len();
        self.insert(index, element)
    }

    pub fn insert(&mut self, index: usize, element: Element) -> ElementId {
        let id = element.id;
        let temporary = element.temporary;
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
        self.events.emit(SceneEvent::ObjectAdded { id, temporary });
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        let element = self.elements.remove(index);
        if self.active == Some(id) {
            self.set_active(None);
        }
        self.events.emit(SceneEvent::ObjectRemoved {
            id,
            temporary: element.temporary,
        });
        Some(element)
    }

    /// Remove every element, topmost first.
    pub fn clear(&mut self) -> Vec<Element> {
        let ids: Vec<ElementId> = self.elements.iter().rev().map(|e| e.id).collect();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    pub fn modify<F>(&mut self, id: ElementId, update: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut Element),
    {
        let element = self
            .get_mut_silent(id)
            .ok_or(SceneError::ElementNotFound(id))?;
        update(element);
        self.events.emit(SceneEvent::ObjectModified { id });
        Ok(())
    }

    /// Move an element to `index` in paint order. Silent, like the scene
    /// library's own z-order calls.
    pub fn move_to(&mut self, id: ElementId, index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let element = self.elements.remove(from);
        let to = index.min(self.elements.len());
        self.elements.insert(to, element);
        from != to
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let last = self.elements.len().saturating_sub(1);
        self.move_to(id, last)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.move_to(id, 0)
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.elements.len() => self.move_to(id, index + 1),
            _ => false,
        }
    }

    pub fn send_backwards(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => self.move_to(id, index - 1),
            _ => false,
        }
    }

    pub fn active(&self) -> Option<ElementId> {
        self.active
    }

    pub fn active_element(&self) -> Option<&Element> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: Option<ElementId>) {
        let id = id.filter(|id| self.index_of(*id).is_some());
        if self.active != id {
            self.active = id;
            self.events.emit(SceneEvent::SelectionChanged { selected: id });
        }
    }

    pub fn discard_active(&mut self) {
        self.set_active(None);
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    /// Topmost interactive element under `pos`.
    pub fn hit_test(&self, pos: Pos2) -> Option<ElementId> {
        topmost_at(&self.elements, pos).map(|element| element.id)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            version: SNAPSHOT_VERSION,
            width: self.width,
            height: self.height,
            background: self.background,
            objects: self
                .elements
                .iter()
                .filter(|element| !element.temporary)
                .cloned()
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Replace the whole scene. Emits a removal for every current element and
    /// an addition for every loaded one.
    pub fn load_snapshot(&mut self, snapshot: SceneSnapshot) {
        self.discard_active();
        self.clear();
        self.width = snapshot.width.max(1);
        self.height = snapshot.height.max(1);
        self.background = snapshot.background;
        debug!("Loading snapshot with {} objects", snapshot.objects.len());
        for element in snapshot.objects {
            self.add(element);
        }
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), SceneError> {
        let snapshot: SceneSnapshot = serde_json::from_str(json)?;
        self.load_snapshot(snapshot);
        Ok(())
    }
}
