//! services/app/src/adapters/storage.rs
//!
//! Durable key-value storage adapters implementing the `KeyValueStore` port.
//! `FileStore` keeps every entry in one JSON object on disk; `MemoryStore`
//! keeps them in process memory and forgets them on exit.

use dashboard_core::ports::{KeyValueStore, PortError, PortResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

type Entries = BTreeMap<String, String>;

//=========================================================================================
// FileStore
//=========================================================================================

/// A key-value store persisted as a single JSON file.
///
/// Every batch rewrites the whole file through a temporary sibling and a
/// rename, so a batch is either fully on disk or not at all.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> PortResult<Entries> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PortError::Storage(format!("{} is not a valid store: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(PortError::Storage(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Loads the current entries for a rewrite. A corrupt file is replaced.
    fn entries_for_update(&self) -> Entries {
        self.read_entries().unwrap_or_else(|e| {
            warn!(error = %e, "starting a fresh session store");
            Entries::new()
        })
    }

    fn write_entries(&self, entries: &Entries) -> PortResult<()> {
        let storage_err = |e: std::io::Error| {
            PortError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| PortError::Storage(e.to_string()))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        let tmp = self.path.with_file_name(format!(".{}.tmp", file_name));
        fs::write(&tmp, json).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)
    }

    fn update<F>(&self, apply: F) -> PortResult<()>
    where
        F: FnOnce(&mut Entries),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PortError::Storage("store lock poisoned".to_string()))?;
        let mut entries = self.entries_for_update();
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> PortResult<()> {
        self.update(|stored| {
            for (key, value) in entries {
                stored.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> PortResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|stored| {
            for key in keys {
                stored.remove(*key);
            }
        })
    }
}

//=========================================================================================
// MemoryStore
//=========================================================================================

/// A store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortError::Storage("store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> PortResult<()> {
        let mut stored = self.lock()?;
        for (key, value) in entries {
            stored.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_entries(&self, keys: &[&str]) -> PortResult<()> {
        let mut stored = self.lock()?;
        for key in keys {
            stored.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get("token").unwrap(), None);
        store.set_entries(&[("token", "abc"), ("user", "{}")]).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn file_store_removes_in_one_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store
            .set_entries(&[("token", "abc"), ("user", "{}"), ("theme", "dark")])
            .unwrap();

        store.remove_entries(&["token", "user"]).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn removing_from_a_missing_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::new(&path);
        store.remove_entries(&["token"]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_reads_as_error_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("token"), Err(PortError::Storage(_))));

        store.set_entries(&[("token", "fresh")]).unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        store.set_entries(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove_entries(&["a", "b"]).unwrap();
        assert_eq!(store.get("b").unwrap(), None);
    }
}
