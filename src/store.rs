use crate::dataset::{PersistedSession, SessionDataset};
use crate::utils::sanitize_filename;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store holding the session blob
pub trait SessionStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store keeping one JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_filename(key)))
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Read the session dataset. Missing, unreadable, or corrupt entries give an empty dataset.
pub fn load_dataset<S: SessionStore + ?Sized>(store: &S, key: &str) -> SessionDataset {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SessionDataset::new(),
        Err(e) => {
            ::log::error!("Error loading stored data: {}", e);
            return SessionDataset::new();
        }
    };

    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(persisted) => SessionDataset::from(persisted),
        Err(e) => {
            ::log::error!("Discarding corrupt stored session: {}", e);
            SessionDataset::new()
        }
    }
}

/// Write the session dataset; failures are logged and otherwise ignored
pub fn save_dataset<S: SessionStore + ?Sized>(store: &mut S, key: &str, dataset: &SessionDataset) {
    let result = serde_json::to_string(&PersistedSession::from(dataset))
        .map_err(StoreError::from)
        .and_then(|json| store.save(key, &json));
    if let Err(e) = result {
        ::log::error!("Error saving data: {}", e);
    }
}

/// Remove the stored session; failures are logged and otherwise ignored
pub fn clear_dataset<S: SessionStore + ?Sized>(store: &mut S, key: &str) {
    if let Err(e) = store.remove(key) {
        ::log::error!("Error clearing stored data: {}", e);
    }
}
