use crate::element::ElementId;

/// Notifications emitted by the scene after it changes.
///
/// `temporary` tells listeners the element is a drag preview, so history
/// tracking can ignore it without looking the element up again.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    ObjectAdded { id: ElementId, temporary: bool },
    ObjectRemoved { id: ElementId, temporary: bool },
    ObjectModified { id: ElementId },
    SelectionChanged { selected: Option<ElementId> },
}

impl SceneEvent {
    pub fn kind(&self) -> SceneEventKind {
        match self {
            SceneEvent::ObjectAdded { .. } => SceneEventKind::ObjectAdded,
            SceneEvent::ObjectRemoved { .. } => SceneEventKind::ObjectRemoved,
            SceneEvent::ObjectModified { .. } => SceneEventKind::ObjectModified,
            SceneEvent::SelectionChanged { .. } => SceneEventKind::SelectionChanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneEventKind {
    ObjectAdded,
    ObjectRemoved,
    ObjectModified,
    SelectionChanged,
}
