use egui::{Pos2, Vec2};
use log::{debug, info, warn};

use super::Editor;
use crate::element::text::DEFAULT_TEXT;
use crate::element::{Element, ElementId, factory};
use crate::history::ActionKind;
use crate::scene::CursorStyle;
use crate::state::EditorState;
use crate::tools::{BuildContext, GestureState, ShapeTool, TextEditSession, ToolMode};

/// Opacity of an element while it is being moved, scaled or rotated.
pub const MODIFY_OPACITY: f32 = 0.5;

impl Editor {
    /// Arm `mode`, replacing whatever tool was armed. `ToolMode::Idle`
    /// disarms.
    pub fn arm_tool(&mut self, mode: ToolMode) {
        self.sync_events();
        if self.state.is_modifying() {
            self.end_modification();
        }
        if mode == ToolMode::Idle {
            self.disarm();
            return;
        }

        self.drop_preview();
        self.text_edit = None;
        self.scene.discard_active();
        self.scene.set_selection_enabled(false);
        self.scene.set_cursor(match mode {
            ToolMode::TextPlacement => CursorStyle::Text,
            _ => CursorStyle::Crosshair,
        });
        if let Some(action) = mode.action() {
            self.last_action = action;
        }
        if self.transition(EditorState::armed(mode)) {
            debug!("Armed {:?} tool", mode);
        }
        self.sync_events();
    }

    /// Return to idle, dropping any preview and re-enabling selection.
    pub fn disarm(&mut self) {
        self.sync_events();
        self.drop_preview();
        self.sync_events();
        self.scene.set_selection_enabled(true);
        self.scene.set_cursor(CursorStyle::Default);
        if !self.state.is_modifying() {
            self.transition(EditorState::Idle);
        }
    }

    /// Escape: cancel the gesture in progress, disarm, stop text editing.
    pub fn handle_escape(&mut self) {
        self.text_edit = None;
        if matches!(self.state, EditorState::Drawing { .. } | EditorState::PlacingText) {
            debug!("Escape cancelled {:?}", self.state.mode());
            self.disarm();
        }
    }

    fn drop_preview(&mut self) {
        if let EditorState::Drawing {
            gesture: GestureState::Tracking {
                preview: Some(id), ..
            },
            ..
        } = self.state
        {
            self.scene.remove(id);
        }
    }

    /// Finish any tool or gesture so a one-shot command starts from idle.
    pub(super) fn settle(&mut self) {
        self.sync_events();
        if self.state.is_modifying() {
            self.end_modification();
        }
        if !self.state.is_idle() {
            self.disarm();
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.sync_events();
        match self.state {
            EditorState::Drawing {
                mode,
                gesture: GestureState::Armed,
            } => {
                if self.scene.rect().contains(pos) {
                    self.transition(EditorState::Drawing {
                        mode,
                        gesture: GestureState::Tracking {
                            anchor: pos,
                            preview: None,
                        },
                    });
                }
            }
            EditorState::PlacingText => {
                if self.scene.hit_test(pos).is_none() {
                    self.place_text(pos);
                }
            }
            EditorState::Idle => self.select_at(pos),
            EditorState::Drawing { .. } | EditorState::Modifying { .. } => {}
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        self.sync_events();
        match self.state {
            EditorState::Drawing {
                mode,
                gesture: GestureState::Tracking { anchor, preview },
            } => self.update_preview(mode, anchor, preview, pos),
            EditorState::Modifying {
                last_pointer: Some(last),
                ..
            } => {
                self.translate_selection(pos - last);
                if let EditorState::Modifying { last_pointer, .. } = &mut self.state {
                    *last_pointer = Some(pos);
                }
            }
            _ => {}
        }
    }

    /// Returns the element a drag tool created, if any.
    pub fn pointer_up(&mut self, pos: Pos2) -> Option<ElementId> {
        self.sync_events();
        match self.state {
            EditorState::Drawing {
                mode,
                gesture: GestureState::Tracking { anchor, preview },
            } => self.finish_drag(mode, anchor, preview, pos),
            EditorState::Modifying {
                last_pointer: Some(_),
                ..
            } => {
                self.end_modification();
                None
            }
            _ => None,
        }
    }

    fn build_element(
        &mut self,
        mode: ToolMode,
        anchor: Pos2,
        pos: Pos2,
        exclude: Option<ElementId>,
    ) -> Option<Element> {
        let tool = mode.drawing_tool()?;
        let mut ctx = BuildContext {
            scene: &self.scene,
            renderer: self.renderer.as_ref(),
            rng: &mut self.rng,
            style: &self.config.style,
            exclude,
        };
        tool.build(anchor, pos, &mut ctx)
            .map_err(|err| warn!("Could not build {}: {}", tool.name(), err))
            .ok()
    }

    fn update_preview(
        &mut self,
        mode: ToolMode,
        anchor: Pos2,
        previous: Option<ElementId>,
        pos: Pos2,
    ) {
        if let Some(id) = previous {
            self.scene.remove(id);
        }
        let preview = self
            .build_element(mode, anchor, pos, previous)
            .map(|element| {
                let opacity = self.config.style.preview_opacity;
                self.scene.add(element.into_preview(opacity))
            });
        self.transition(EditorState::Drawing {
            mode,
            gesture: GestureState::Tracking { anchor, preview },
        });
        self.sync_events();
    }

    fn finish_drag(
        &mut self,
        mode: ToolMode,
        anchor: Pos2,
        preview: Option<ElementId>,
        pos: Pos2,
    ) -> Option<ElementId> {
        let tool = mode.drawing_tool()?;
        if let Some(id) = preview {
            self.scene.remove(id);
        }

        if !tool.meets_threshold(anchor, pos) {
            debug!("{} drag too small, nothing added", tool.name());
            self.transition(EditorState::Drawing {
                mode,
                gesture: GestureState::Armed,
            });
            self.sync_events();
            return None;
        }

        let created = self.build_element(mode, anchor, pos, None).map(|element| {
            let id = self.scene.add(element);
            self.scene.bring_to_front(id);
            info!("Created {} {}", tool.name(), id);
            id
        });
        // Flush while still drawing so the preview removal stays out of history
        self.sync_events();
        self.disarm();
        created
    }

    /// Idle click: select the topmost selectable element and start a
    /// pointer-driven move.
    fn select_at(&mut self, pos: Pos2) {
        let hit = self
            .scene
            .hit_test(pos)
            .filter(|id| self.scene.get(*id).is_some_and(|element| element.selectable));
        if self.text_edit.is_some_and(|session| Some(session.id) != hit) {
            self.text_edit = None;
        }
        if !self.scene.selection_enabled() {
            return;
        }
        self.scene.set_active(hit);
        self.sync_events();
        if hit.is_some() {
            self.begin_modification_at(Some(pos));
        }
    }

    fn place_text(&mut self, pos: Pos2) {
        self.last_action = ActionKind::Text;
        let style = &self.config.style;
        let element = factory::create_text(DEFAULT_TEXT, pos, style.font_size, style.color);
        let id = self.scene.add(element);

        self.scene.set_selection_enabled(true);
        self.scene.set_cursor(CursorStyle::Default);
        self.scene.set_active(Some(id));
        self.text_edit = Some(TextEditSession::new(id));
        self.transition(EditorState::Idle);
        self.sync_events();
        info!("Placed text {}", id);
    }

    pub fn text_edit(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    /// Type into the text being edited. The placeholder is replaced by the
    /// first input while it is still fully selected.
    pub fn type_text(&mut self, input: &str) -> bool {
        let Some(mut session) = self.text_edit else {
            return false;
        };
        let Some(content) = self
            .scene
            .get(session.id)
            .and_then(Element::as_text)
            .map(|text| text.content.clone())
        else {
            self.text_edit = None;
            return false;
        };

        let updated = session.apply(&content, input);
        self.text_edit = Some(session);
        let result = self.scene.modify(session.id, |element| {
            if let Some(text) = element.as_text_mut() {
                text.content = updated;
            }
        });
        self.sync_events();
        result.is_ok()
    }

    pub fn finish_text_editing(&mut self) {
        self.text_edit = None;
    }

    /// Replace the content of the selected text element, or add a new text
    /// element in the middle of the canvas when no text is selected.
    pub fn insert_text(&mut self, content: &str) -> ElementId {
        self.settle();
        let selected_text = self
            .scene
            .active_element()
            .filter(|element| element.as_text().is_some())
            .map(|element| element.id);

        if let Some(id) = selected_text {
            let result = self.scene.modify(id, |element| {
                if let Some(text) = element.as_text_mut() {
                    text.content = content.to_owned();
                }
            });
            if let Err(err) = result {
                warn!("Could not replace text: {}", err);
            }
            self.sync_events();
            return id;
        }

        self.last_action = ActionKind::Text;
        let style = &self.config.style;
        let center = self.scene.rect().center();
        let element = factory::create_text(content, center, style.font_size, style.color);
        let id = self.scene.add(element);
        self.scene.set_active(Some(id));
        self.sync_events();
        id
    }

    /// Add a numbered annotation at the default position with the next
    /// sequence number.
    pub fn add_numbered_annotation(&mut self) -> ElementId {
        self.settle();
        self.last_action = ActionKind::Annotation;
        let number = self.annotations.take();
        let element = factory::create_annotation(
            number,
            self.config.annotation.position,
            self.config.annotation.radius,
            self.config.style.color,
        );
        let id = self.scene.add(element);
        self.scene.set_active(Some(id));
        self.sync_events();
        debug!("Added annotation {}", number);
        id
    }

    /// The number the next annotation will get.
    pub fn annotation_counter(&self) -> u32 {
        self.annotations.current()
    }

    pub fn reset_annotation_counter(&mut self) {
        self.annotations.reset();
    }

    /// Start a programmatic move/scale/rotate of the selection.
    pub fn begin_modification(&mut self) -> bool {
        self.sync_events();
        self.begin_modification_at(None)
    }

    fn begin_modification_at(&mut self, pointer: Option<Pos2>) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        let Some(id) = self.scene.active() else {
            return false;
        };
        let Some(element) = self.scene.get_mut_silent(id) else {
            return false;
        };
        let opacity = element.opacity;
        element.opacity = MODIFY_OPACITY;
        self.transition(EditorState::Modifying {
            id,
            opacity,
            last_pointer: pointer,
            changed: false,
        })
    }

    /// End the gesture: restore opacity and, if anything changed, start the
    /// modify commit debounce.
    pub fn end_modification(&mut self) -> bool {
        self.sync_events();
        let EditorState::Modifying {
            id,
            opacity,
            changed,
            ..
        } = self.state
        else {
            return false;
        };

        if let Some(element) = self.scene.get_mut_silent(id) {
            element.opacity = opacity;
        }
        self.transition(EditorState::Idle);
        if changed {
            if let Err(err) = self.scene.modify(id, |_| {}) {
                debug!("Modified element is gone: {}", err);
            }
        }
        self.sync_events();
        true
    }

    /// Apply `update` to the element being modified, or to the selection
    /// outside a gesture.
    fn modify_selection(&mut self, update: impl FnOnce(&mut Element)) -> bool {
        let Some(id) = self.state.modifying_id().or(self.scene.active()) else {
            return false;
        };
        if self.scene.modify(id, update).is_err() {
            return false;
        }
        if let EditorState::Modifying { changed, .. } = &mut self.state {
            *changed = true;
        }
        self.sync_events();
        true
    }

    pub fn translate_selection(&mut self, delta: Vec2) -> bool {
        self.modify_selection(|element| element.translate(delta))
    }

    pub fn scale_selection(&mut self, factor: Vec2) -> bool {
        self.modify_selection(|element| element.scale_by(factor))
    }

    pub fn rotate_selection(&mut self, degrees: f32) -> bool {
        self.modify_selection(|element| element.rotate_by(degrees))
    }
}
