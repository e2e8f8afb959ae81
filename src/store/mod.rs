//! # Persistence
//!
//! Opaque string blobs under string keys, the moral equivalent of browser
//! local storage. Values are JSON documents owned by the collaborators:
//!
//! - [`history`]: recent generated quotes (`quote1-openai-history`)
//! - [`templates`]: named editor snapshots (`quoteTemplates`)

pub mod history;
pub mod templates;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::QuoteCardError;

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteCardError>;
    fn set(&self, key: &str, value: &str) -> Result<(), QuoteCardError>;
    fn remove(&self, key: &str) -> Result<(), QuoteCardError>;
}

// ============================================================================
// FILE STORE
// ============================================================================

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.local/share/quotecard` (or the platform's data directory).
    pub fn default_location() -> Self {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("quotecard"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteCardError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuoteCardError::Store(format!("Failed to read '{}': {}", key, e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteCardError> {
        let store_err = |e: std::io::Error| QuoteCardError::Store(format!("Failed to write '{}': {}", key, e));

        std::fs::create_dir_all(&self.dir).map_err(store_err)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(store_err)?;
        std::fs::rename(&tmp, &path).map_err(store_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), QuoteCardError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuoteCardError::Store(format!("Failed to remove '{}': {}", key, e))),
        }
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// In-process store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteCardError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteCardError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), QuoteCardError> {
        self.entries().remove(key);
        Ok(())
    }
}
