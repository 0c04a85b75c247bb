use thiserror::Error;

use crate::element::ElementId;

/// Errors raised by the scene itself.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Element {0} is not in the scene")]
    ElementNotFound(ElementId),

    #[error("Invalid scene snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Errors raised while rasterizing or encoding.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to render: region is empty")]
    EmptyRegion,

    #[error("Image codec failed: {0}")]
    Codec(#[from] image::ImageError),
}

/// Errors surfaced by editor operations that can fail for reasons other than
/// unmet preconditions (which are reported as no-ops).
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Unsupported image data: {0}")]
    UnsupportedImage(#[from] image::ImageError),
}

pub type EditorResult<T> = Result<T, EditorError>;
