#![warn(clippy::all, rust_2018_idioms)]

pub mod background;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod layer;
pub mod placement;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod tools;
pub mod util;

pub use background::{
    BackgroundRemovalError, BackgroundRemovalService, RemovalJob, RemovalOutcome, RemovalProgress,
    ServiceError,
};
pub use config::EditorConfig;
pub use editor::{Editor, EditorBuilder, Task};
pub use element::{Element, ElementId, ElementKind};
pub use error::{EditorError, EditorResult};
pub use history::{ActionKind, HistoryEntry};
pub use layer::{LayerDescriptor, LayerOp};
pub use renderer::{RenderRequest, SceneRenderer, SoftwareRenderer};
pub use scene::Scene;
pub use state::{AutosaveStore, EditorState, FileStorage, MemoryStorage, Storage};
pub use tools::ToolMode;
pub use util::{Clock, ManualClock, SystemClock};
