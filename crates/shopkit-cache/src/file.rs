//! JSON-file backed key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::{CacheError, KeyValueStore};

/// A store that keeps every key in a single JSON object on disk.
///
/// Writes go to a uniquely named sibling temp file that is then renamed over
/// the target, so a crash mid-write leaves the previous contents intact and
/// concurrent writers never share a temp file.
///
/// Every `set`/`remove` re-reads the file before writing it back. Within one
/// process these cycles are serialized; across processes they are not, and
/// when two processes update the file at the same instant the later rename
/// wins for the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`.
    ///
    /// The parent directory is created if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| CacheError::OpenError(format!("{}: {}", parent.display(), e)))?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CacheError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(entries)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| CacheError::from(e.error))?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, CacheError> {
        self.lock
            .lock()
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let _guard = self.guard()?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let _guard = self.guard()?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        } else {
            tracing::trace!(key, "remove of missing key");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStore::open(&path).unwrap();
        store.set("token", "abc").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let store = FileStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();
        store.remove("never-set").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_instances_share_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let first = FileStore::open(&path).unwrap();
        let second = FileStore::open(&path).unwrap();

        first.set("token", "abc").unwrap();
        second.set("app_cart_v1", "[]").unwrap();
        first.remove("missing").unwrap();

        assert_eq!(first.get("app_cart_v1").unwrap().as_deref(), Some("[]"));
        assert_eq!(second.get("token").unwrap().as_deref(), Some("abc"));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn test_file_store_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(matches!(store.get("a"), Err(CacheError::SerializeError(_))));
    }
}
