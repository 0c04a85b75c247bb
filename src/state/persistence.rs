use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::Color32;
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::Element;
use crate::scene::{SNAPSHOT_VERSION, Scene, SceneSnapshot};

/// Errors that can occur during state persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write state: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read state file: {0}")]
    ReadError(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid state data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// String-keyed blob store the autosave writes into.
pub trait Storage {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PersistenceResult<()>;
    fn remove(&self, key: &str) -> PersistenceResult<()>;
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    state_dir: PathBuf,
}

impl FileStorage {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.state_dir.join(format!("{}.json", file_name))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistenceError::ReadError(err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        // Create state directory if it doesn't exist
        fs::create_dir_all(&self.state_dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// The browser's `localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn store(&self) -> PersistenceResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| PersistenceError::StorageUnavailable("no window".to_owned()))?
            .local_storage()
            .map_err(|err| PersistenceError::StorageUnavailable(format!("{:?}", err)))?
            .ok_or_else(|| PersistenceError::StorageUnavailable("localStorage disabled".to_owned()))
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.store()?
            .get_item(key)
            .map_err(|err| PersistenceError::ReadError(format!("{:?}", err)))
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        // Quota errors end up here
        self.store()?
            .set_item(key, value)
            .map_err(|err| PersistenceError::StorageUnavailable(format!("{:?}", err)))
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.store()?
            .remove_item(key)
            .map_err(|err| PersistenceError::StorageUnavailable(format!("{:?}", err)))
    }
}

/// What the autosave slot holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveRecord {
    pub version: u32,
    /// Milliseconds from the editor's clock at save time.
    pub timestamp: u64,
    pub width: u32,
    pub height: u32,
    pub background: Color32,
    pub objects: Vec<Element>,
}

impl AutosaveRecord {
    pub fn capture(scene: &Scene, timestamp: u64) -> Self {
        let SceneSnapshot {
            version,
            width,
            height,
            background,
            objects,
        } = scene.snapshot();
        Self {
            version,
            timestamp,
            width,
            height,
            background,
            objects,
        }
    }

    /// Worth restoring: has content, or at least a non-default background.
    pub fn is_meaningful(&self, default_background: Color32) -> bool {
        !self.objects.is_empty() || self.background != default_background
    }

    pub fn into_snapshot(self) -> SceneSnapshot {
        SceneSnapshot {
            version: self.version,
            width: self.width,
            height: self.height,
            background: self.background,
            objects: self.objects,
        }
    }
}

/// Reads and writes the scene's autosave slot.
pub struct AutosaveStore {
    storage: Box<dyn Storage>,
    key: String,
    default_background: Color32,
}

impl std::fmt::Debug for AutosaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveStore")
            .field("key", &self.key)
            .field("default_background", &self.default_background)
            .finish()
    }
}

impl AutosaveStore {
    pub fn new(storage: Box<dyn Storage>, key: impl Into<String>, default_background: Color32) -> Self {
        Self {
            storage,
            key: key.into(),
            default_background,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&self, scene: &Scene, timestamp: u64) -> PersistenceResult<()> {
        let record = AutosaveRecord::capture(scene, timestamp);
        let json = serde_json::to_string(&record)?;
        self.storage.set(&self.key, &json)?;
        debug!("Autosaved {} objects ({} bytes)", record.objects.len(), json.len());
        Ok(())
    }

    /// The stored scene, if there is one worth restoring.
    ///
    /// Missing, unreadable, corrupt and trivial records all count as
    /// "nothing to restore".
    pub fn load(&self) -> Option<SceneSnapshot> {
        let json = match self.storage.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(err) => {
                warn!("Could not read autosave: {}", err);
                return None;
            }
        };

        let record = match self.parse(&json) {
            Ok(record) => record,
            Err(err) => {
                warn!("Ignoring autosave: {}", err);
                return None;
            }
        };

        if !record.is_meaningful(self.default_background) {
            debug!("Autosave is empty, starting fresh");
            return None;
        }

        info!("Restoring autosave with {} objects", record.objects.len());
        Some(record.into_snapshot())
    }

    fn parse(&self, json: &str) -> PersistenceResult<AutosaveRecord> {
        let record: AutosaveRecord = serde_json::from_str(json)?;
        if record.version > SNAPSHOT_VERSION {
            return Err(PersistenceError::InvalidState(format!(
                "unsupported version {}",
                record.version
            )));
        }
        Ok(record)
    }

    pub fn clear(&self) -> PersistenceResult<()> {
        self.storage.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::{Pos2, Rect, Vec2};

    fn store(storage: &MemoryStorage) -> AutosaveStore {
        AutosaveStore::new(Box::new(storage.clone()), "autosave", Color32::WHITE)
    }

    #[test]
    fn empty_white_scene_is_not_restored() {
        let storage = MemoryStorage::new();
        let autosave = store(&storage);
        autosave.save(&Scene::new(800, 600, Color32::WHITE), 1).unwrap();

        assert_eq!(storage.len(), 1);
        assert!(autosave.load().is_none());
    }

    #[test]
    fn coloured_background_alone_is_restored() {
        let storage = MemoryStorage::new();
        let autosave = store(&storage);
        autosave.save(&Scene::new(640, 480, Color32::BLACK), 1).unwrap();

        let snapshot = autosave.load().unwrap();
        assert_eq!(snapshot.background, Color32::BLACK);
        assert_eq!((snapshot.width, snapshot.height), (640, 480));
    }

    #[test]
    fn corrupt_or_future_records_are_ignored() {
        let storage = MemoryStorage::new();
        storage.set("autosave", "{ not json").unwrap();
        assert!(store(&storage).load().is_none());

        let mut scene = Scene::new(100, 100, Color32::WHITE);
        scene.add(factory::create_rectangle(
            Rect::from_min_size(Pos2::ZERO, Vec2::splat(20.0)),
            2.0,
            0.0,
            Color32::RED,
        ));
        let mut record = AutosaveRecord::capture(&scene, 5);
        record.version = SNAPSHOT_VERSION + 1;
        storage
            .set("autosave", &serde_json::to_string(&record).unwrap())
            .unwrap();
        assert!(store(&storage).load().is_none());
    }

    #[test]
    fn file_storage_treats_missing_files_as_empty() {
        let dir = std::env::temp_dir().join(format!("annotation-canvas-{}", uuid::Uuid::new_v4()));
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.get("slot").unwrap(), None);
        storage.set("slot", "{}").unwrap();
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("{}"));
        storage.remove("slot").unwrap();
        storage.remove("slot").unwrap();
        assert_eq!(storage.get("slot").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }
}
