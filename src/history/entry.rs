use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::raster::Thumbnail;

/// One immutable point on the undo/redo timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Scene serialized with [`Scene::to_json`](crate::scene::Scene::to_json).
    pub snapshot: String,
    pub label: String,
    pub kind: ActionKind,
    /// Milliseconds from the editor's clock.
    pub timestamp: u64,
    #[serde(skip)]
    pub thumbnail: Option<Thumbnail>,
}

impl HistoryEntry {
    pub fn new(snapshot: String, kind: ActionKind, label: Option<&str>, timestamp: u64) -> Self {
        Self {
            snapshot,
            label: label.unwrap_or(kind.default_label()).to_owned(),
            kind,
            timestamp,
            thumbnail: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<Thumbnail>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
}
