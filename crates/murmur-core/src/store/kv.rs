//! Key-value storage medium.
//!
//! The chat store only needs string values under string keys, the same shape
//! as browser local storage. `FileStore` keeps one `<key>.json` file per key;
//! `MemoryStore` keeps everything in process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::StoreError;
use crate::utils;

/// A durable string-to-string map.
///
/// Implementations assume a single writer; no transactions.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ─────────────────────────────────────────────
// FileStore
// ─────────────────────────────────────────────

/// Directory-backed store: `{dir}/{safe_key}.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `dir`.
    ///
    /// `dir` defaults to `~/.murmur/store/` if `None`. The directory is
    /// created if it doesn't exist.
    pub fn new(dir: Option<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.unwrap_or_else(utils::get_store_path);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Root directory of this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", utils::safe_filename(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Io {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        std::fs::write(&path, value).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        debug!(key, path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// ─────────────────────────────────────────────
// MemoryStore
// ─────────────────────────────────────────────

/// In-process store. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_get_missing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(store.get("saved_chats").unwrap().is_none());
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(Some(dir.path().to_path_buf())).unwrap();

        store.set("saved_chats", "[]").unwrap();
        assert!(dir.path().join("saved_chats.json").exists());
        assert_eq!(store.get("saved_chats").unwrap().as_deref(), Some("[]"));

        store.remove("saved_chats").unwrap();
        assert!(store.get("saved_chats").unwrap().is_none());
        // Removing again is fine
        store.remove("saved_chats").unwrap();
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(Some(nested.clone())).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(Some(dir.path().to_path_buf())).unwrap();
        store.set("../escape", "x").unwrap();
        assert!(dir.path().join(".._escape.json").exists());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        {
            let store = FileStore::new(Some(dir.path().to_path_buf())).unwrap();
            store.set("prompt_templates", "[1]").unwrap();
        }
        let store = FileStore::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(store.get("prompt_templates").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }
}
