use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file {path} is not a JSON object: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("No data directory available")]
    NoDataDir,
}

/// String key-value store supplied by the host.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    store: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let store = self.store.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(store.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut store = self.store.lock().map_err(|_| StorageError::Poisoned)?;
        store.insert(key.to_string(), value);
        Ok(())
    }
}

/// Keeps every key in one JSON object file, rewritten on each `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// `<data_local_dir>/universe-client/storage.json`
    pub fn default_path() -> Result<PathBuf, StorageError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("universe-client").join("storage.json"))
            .ok_or(StorageError::NoDataDir)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = load_entries(&path)?;
        debug!("Loaded {} storage entries from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Written to a sibling temp file and renamed over the target, so a
    // failed write leaves the previous file intact.
    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StorageError::Io { path, source }
        };

        fs::create_dir_all(dir).map_err(io_err(dir))?;

        let data = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(data.as_bytes()).map_err(io_err(&tmp_path))?;
        tmp.as_file().sync_all().map_err(io_err(&tmp_path))?;
        tmp.persist(&self.path)
            .map_err(|e| io_err(&self.path)(e.error))?;

        debug!("Saved {} storage entries to disk", entries.len());
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<HashMap<String, String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).map_err(|source| StorageError::Format {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No existing storage file at {}", path.display());
            Ok(HashMap::new())
        }
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// Memory is only updated once the file write has succeeded.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "one".to_string()).unwrap();
        store.set("k", "two".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        // Clones share the same map.
        let other = store.clone();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", r#"{"a":1}"#.to_string()).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let store = FileStore::open(blocker.join("storage.json")).unwrap();

        // The parent directory cannot be created over a regular file.
        fs::write(&blocker, "").unwrap();

        assert!(matches!(
            store.set("k", "v".to_string()),
            Err(StorageError::Io { .. })
        ));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("a", "1".to_string()).unwrap();
        store.set("a", "2".to_string()).unwrap();
        store.set("b", "3".to_string()).unwrap();

        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec![std::ffi::OsString::from("storage.json")]);

        let on_disk: HashMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk["a"], "2");
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StorageError::Format { .. })
        ));
    }
}
