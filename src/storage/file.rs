//! JSON-file backed key-value store.
//!
//! The whole namespace is one JSON object on disk (default
//! `~/.cro-auditor/storage.json`). It is read once on open and rewritten
//! after every mutation. A byte quota caps the serialized size; a write
//! that would exceed it is rejected and the in-memory state rolled back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::StorageError;

/// Persistent key-value store serialized to a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    quota_bytes: usize,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A corrupt or unreadable file is logged and treated as empty so the
    /// tool stays usable; the next successful write replaces it.
    pub fn open(path: impl Into<PathBuf>, quota_bytes: usize) -> Self {
        let path = path.into();
        let entries = Self::load_from_disk(&path);
        Self {
            path,
            quota_bytes: quota_bytes.max(1),
            entries: Mutex::new(entries),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> BTreeMap<String, String> {
        match std::fs::read_to_string(path) {
            Ok(data) if data.trim().is_empty() => BTreeMap::new(),
            Ok(data) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Storage file is corrupt, starting empty: {}", e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read storage file, starting empty: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn write_to_disk(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_string(entries)?;
        if data.len() > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                needed: data.len(),
                limit: self.quota_bytes,
            });
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, data)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // API keys live in here.
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }

    /// Apply `mutate` and persist; restore the previous state on failure.
    fn mutate<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let previous = guard.clone();
        mutate(&mut guard);
        if let Err(e) = self.write_to_disk(&guard) {
            *guard = previous;
            return Err(e);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!(key, bytes = value.len(), "storage set");
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        {
            let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if !guard.contains_key(key) {
                return Ok(());
            }
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
