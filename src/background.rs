//! Background removal for the selected image.
//!
//! The slow part runs through an external [`BackgroundRemovalService`]. To
//! keep the editor usable while it runs, an operation is split in three:
//! [`Editor::begin_background_removal`](crate::Editor::begin_background_removal)
//! checks preconditions and prepares a [`RemovalJob`], the job is awaited
//! without borrowing the editor, and
//! [`Editor::finish_background_removal`](crate::Editor::finish_background_removal)
//! applies the [`RemovalOutcome`].
use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use log::{debug, warn};
use thiserror::Error;

use crate::element::ElementId;

pub const NO_SELECTION_MESSAGE: &str = "Please select an image first";
pub const NOT_AN_IMAGE_MESSAGE: &str = "Selected object is not an image";
pub const SERVICE_FAILURE_MESSAGE: &str = "Failed to remove background. Please try again.";

/// Why a removal did not happen. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackgroundRemovalError {
    #[error("Background removal is already in progress")]
    AlreadyProcessing,

    #[error("{}", NO_SELECTION_MESSAGE)]
    NoSelection,

    #[error("{}", NOT_AN_IMAGE_MESSAGE)]
    NotAnImage,

    /// The service or codec failed; `detail` is for logs only.
    #[error("{}", SERVICE_FAILURE_MESSAGE)]
    Service { detail: String },

    /// The image was removed from the scene while the service ran.
    #[error("The image is no longer on the canvas")]
    TargetGone,
}

/// Failure reported by a removal service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Progress notification forwarded from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalProgress {
    pub stage: String,
    pub current: u64,
    pub total: u64,
}

impl RemovalProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f32 / self.total as f32).clamp(0.0, 1.0)
        }
    }
}

/// Turns an encoded image into one with a transparent background.
pub trait BackgroundRemovalService {
    fn remove_background<'a>(
        &'a self,
        png: Vec<u8>,
        progress: &'a mut dyn FnMut(RemovalProgress),
    ) -> LocalBoxFuture<'a, Result<Vec<u8>, ServiceError>>;
}

/// Holds the editor's one-removal-at-a-time slot. Dropping it, whether the
/// removal finished or was abandoned, frees the slot.
#[derive(Debug)]
pub(crate) struct InProgress(Rc<Cell<bool>>);

impl InProgress {
    /// `None` while another removal holds the slot.
    pub(crate) fn acquire(slot: &Rc<Cell<bool>>) -> Option<Self> {
        if slot.replace(true) {
            None
        } else {
            Some(Self(Rc::clone(slot)))
        }
    }
}

impl Drop for InProgress {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Input for one service call, detached from the editor.
///
/// Dropping the job (or its outcome) without finishing cancels the removal.
#[derive(Debug)]
pub struct RemovalJob {
    pub target: ElementId,
    /// The selected image re-encoded as PNG.
    pub png: Vec<u8>,
    pub(crate) guard: InProgress,
}

impl RemovalJob {
    pub async fn run(
        self,
        service: &dyn BackgroundRemovalService,
        progress: &mut dyn FnMut(RemovalProgress),
    ) -> RemovalOutcome {
        let RemovalJob { target, png, guard } = self;
        debug!("Sending {} bytes for background removal", png.len());
        let result = service.remove_background(png, progress).await;
        if let Err(err) = &result {
            warn!("Background removal service failed: {}", err);
        }
        RemovalOutcome {
            target,
            result,
            guard,
        }
    }
}

/// What came back from the service for `target`.
#[derive(Debug)]
pub struct RemovalOutcome {
    pub target: ElementId,
    pub result: Result<Vec<u8>, ServiceError>,
    pub(crate) guard: InProgress,
}
