mod editor_state;
mod persistence;

pub use editor_state::EditorState;
#[cfg(target_arch = "wasm32")]
pub use persistence::LocalStorage;
pub use persistence::{
    AutosaveRecord,
    AutosaveStore,
    FileStorage,
    MemoryStorage,
    PersistenceError,
    PersistenceResult,
    Storage,
};
