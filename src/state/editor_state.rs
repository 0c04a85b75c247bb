//! Interaction state of the editor.
//!
//! Exactly one of these is current at a time, which is what keeps two tools
//! from ever being armed together and drives the history flags: removals
//! while [`EditorState::Drawing`] or [`EditorState::Modifying`] are preview
//! or gesture churn, not deletions.
//!
//! ```text
//!            ┌──────────────┐
//!      ┌─────►   Drawing    ├─────┐
//!      │     └──────────────┘     │
//! ┌────┴─┐   ┌──────────────┐   ┌─▼────┐
//! │ Idle ├───► PlacingText  ├───► Idle │
//! └────┬─┘   └──────────────┘   └─▲────┘
//!      │     ┌──────────────┐     │
//!      └─────►  Modifying   ├─────┘
//!            └──────────────┘
//! ```
//! Arming another tool from `Drawing` or `PlacingText` is also allowed; it
//! replaces the current one.
use egui::Pos2;

use crate::element::ElementId;
use crate::tools::{GestureState, ToolMode};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditorState {
    /// Pointer selects, nothing armed.
    #[default]
    Idle,
    /// A drag tool is armed or tracking.
    Drawing { mode: ToolMode, gesture: GestureState },
    /// The text tool waits for a click on empty canvas.
    PlacingText,
    /// An element is being moved, scaled or rotated.
    Modifying {
        id: ElementId,
        /// Opacity to restore when the gesture ends.
        opacity: f32,
        /// Set when the gesture is pointer driven.
        last_pointer: Option<Pos2>,
        changed: bool,
    },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            (_, EditorState::Idle) => true,
            (EditorState::Idle, _) => true,
            // Re-arming swaps tools; tracking updates stay in Drawing
            (
                EditorState::Drawing { .. } | EditorState::PlacingText,
                EditorState::Drawing { .. } | EditorState::PlacingText,
            ) => true,
            (EditorState::Modifying { id: a, .. }, EditorState::Modifying { id: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Build the state for arming `mode`.
    pub fn armed(mode: ToolMode) -> Self {
        match mode {
            ToolMode::Idle => EditorState::Idle,
            ToolMode::TextPlacement => EditorState::PlacingText,
            mode => EditorState::Drawing {
                mode,
                gesture: GestureState::Armed,
            },
        }
    }

    pub fn mode(&self) -> ToolMode {
        match self {
            EditorState::Drawing { mode, .. } => *mode,
            EditorState::PlacingText => ToolMode::TextPlacement,
            EditorState::Idle | EditorState::Modifying { .. } => ToolMode::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    /// A drag tool is armed; its preview churn must not reach history.
    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    pub fn is_modifying(&self) -> bool {
        matches!(self, EditorState::Modifying { .. })
    }

    pub fn gesture(&self) -> Option<GestureState> {
        match self {
            EditorState::Drawing { gesture, .. } => Some(*gesture),
            _ => None,
        }
    }

    pub fn modifying_id(&self) -> Option<ElementId> {
        match self {
            EditorState::Modifying { id, .. } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_replaces_the_previous_tool() {
        let rect = EditorState::armed(ToolMode::Rectangle);
        let arrow = EditorState::armed(ToolMode::Arrow);
        assert!(rect.can_transition_to(&arrow));
        assert_eq!(arrow.mode(), ToolMode::Arrow);
        assert!(arrow.is_drawing());
        assert_eq!(EditorState::armed(ToolMode::TextPlacement), EditorState::PlacingText);
    }

    #[test]
    fn modifying_is_exclusive_with_drawing() {
        let modifying = EditorState::Modifying {
            id: ElementId::new(),
            opacity: 1.0,
            last_pointer: None,
            changed: false,
        };
        assert!(!modifying.can_transition_to(&EditorState::armed(ToolMode::Blur)));
        assert!(!EditorState::armed(ToolMode::Blur).can_transition_to(&modifying));
        assert!(modifying.can_transition_to(&EditorState::Idle));
        assert_eq!(modifying.mode(), ToolMode::Idle);
    }
}
