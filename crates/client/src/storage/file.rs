//! File-backed store.
//!
//! All keys live in one JSON object file. Every read goes to disk so that
//! changes made by another process are seen on the next read; every write
//! rewrites the whole file through its own sibling temp file and a rename,
//! so concurrent writers never expose a half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// Errors inside the file backend.
///
/// These never leave the [`KeyValueStore`] methods; they are logged and the
/// operation degrades to a no-op.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Store persisted as a JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store at `path`. The file and its parent directories are
    /// created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(io_err)?;

        let raw = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(raw.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Load for a mutation. A corrupt file is treated as empty so the next
    /// write replaces it; an unreadable file aborts the mutation.
    fn load_for_update(&self) -> Option<Entries> {
        match self.load() {
            Ok(entries) => Some(entries),
            Err(e @ StoreError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "Replacing corrupt store file");
                Some(Entries::new())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Store unavailable, dropping write");
                None
            }
        }
    }

    fn update(&self, key: &str, apply: impl FnOnce(&mut Entries) -> bool) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(mut entries) = self.load_for_update() else {
            return;
        };
        if !apply(&mut entries) {
            return;
        }
        match self.save(&entries) {
            Ok(()) => tracing::debug!(key, path = %self.path.display(), "Store updated"),
            Err(e) => tracing::warn!(key, error = %e, "Store write failed"),
        }
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(key, error = %e, "Store read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        self.update(key, |entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        });
    }

    fn delete(&self, key: &str) {
        self.update(key, |entries| entries.remove(key).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::new(&path);
        store.write("token", "abc");
        store.write("user", "{\"id\":\"1\"}");

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.read("token").as_deref(), Some("abc"));
        assert_eq!(reopened.read("user").as_deref(), Some("{\"id\":\"1\"}"));
    }

    #[test]
    fn test_file_store_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        store.write("a", "1");
        store.delete("a");
        store.delete("never-written");
        assert_eq!(store.read("a"), None);
    }

    #[test]
    fn test_missing_file_reads_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.read("a"), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_reads_absent_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.read("a"), None);

        store.write("a", "1");
        assert_eq!(store.read("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_concurrent_writers_never_corrupt_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        for round in 0..20 {
            std::thread::scope(|scope| {
                for writer in 0..4 {
                    let store = FileStore::new(&path);
                    scope.spawn(move || {
                        for n in 0..20 {
                            store.write(&format!("k{writer}_{n}"), "v");
                        }
                    });
                }
            });

            let store = FileStore::new(&path);
            assert!(store.load().is_ok(), "round {round}: store file corrupt");
        }

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "store.json")
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn test_sees_external_modification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::new(&path);
        store.write("a", "1");

        fs::write(&path, r#"{"a": "2"}"#).unwrap();
        assert_eq!(store.read("a").as_deref(), Some("2"));
    }
}
