//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::{CacheError, KeyValueStore};

/// In-memory store for tests and ephemeral sessions.
///
/// Clones share the same underlying map. The store can be switched into an
/// unavailable mode where every operation fails, which lets callers exercise
/// their handling of storage outages.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.check_available()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("nope").is_ok());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("shared", "yes").unwrap();
        assert_eq!(other.get("shared").unwrap().as_deref(), Some("yes"));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_unavailable_fails_all_operations() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set_unavailable(true);

        assert!(matches!(store.get("a"), Err(CacheError::Unavailable)));
        assert!(matches!(store.set("a", "2"), Err(CacheError::Unavailable)));
        assert!(matches!(store.remove("a"), Err(CacheError::Unavailable)));

        store.set_unavailable(false);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
