use serde::{Deserialize, Serialize};

/// Why a history entry was committed.
///
/// Tools set the editor's "last intended action" to one of these when they
/// are armed; debounced creation commits are labelled with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Initial,
    Restored,
    #[default]
    Add,
    Image,
    Text,
    Arrow,
    Rectangle,
    Circle,
    Blur,
    Magnifier,
    Annotation,
    Duplicate,
    Delete,
    Modify,
    Layer,
    Clear,
    Background,
    Resize,
    BackgroundRemoval,
}

impl ActionKind {
    /// Human-readable label used when a commit doesn't supply its own.
    pub fn default_label(self) -> &'static str {
        match self {
            ActionKind::Initial => "Initial state",
            ActionKind::Restored => "Restored from autosave",
            ActionKind::Add => "Added an element",
            ActionKind::Image => "Added an image",
            ActionKind::Text => "Added text",
            ActionKind::Arrow => "Added an arrow",
            ActionKind::Rectangle => "Added a rectangle",
            ActionKind::Circle => "Added a circle",
            ActionKind::Blur => "Added a blur region",
            ActionKind::Magnifier => "Added a magnifier",
            ActionKind::Annotation => "Added a numbered annotation",
            ActionKind::Duplicate => "Duplicated an element",
            ActionKind::Delete => "Removed an element",
            ActionKind::Modify => "Modified an element",
            ActionKind::Layer => "Changed layer order",
            ActionKind::Clear => "Cleared the canvas",
            ActionKind::Background => "Changed the background color",
            ActionKind::Resize => "Resized the canvas",
            ActionKind::BackgroundRemoval => "Removed an image background",
        }
    }

    /// Actions whose entries always carry a thumbnail, regardless of the
    /// sampling interval.
    pub fn always_thumbnailed(self) -> bool {
        matches!(
            self,
            ActionKind::Image | ActionKind::Clear | ActionKind::Background
        )
    }
}
