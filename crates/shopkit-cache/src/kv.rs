//! Key-value store trait with a typed JSON wrapper.

use std::sync::Arc;

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// A string key-value store.
///
/// This is the storage capability client state is persisted through. It
/// mirrors browser local storage: values are strings, keys are flat, and
/// every operation may fail without the caller having to treat the failure
/// as fatal.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }
}

/// Type-safe cache over a [`KeyValueStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
///
/// # Example
///
/// ```rust,ignore
/// let cache = Cache::new(MemoryStore::new());
/// cache.set("cart:user123", &cart)?;
/// let cart: Option<Cart> = cache.get("cart:user123")?;
/// ```
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: KeyValueStore> Cache<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the cache and return the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use shopkit_cache::cache_key;
/// let key = cache_key!("cart", "v1");
/// assert_eq!(key, "cart:v1");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        count: u32,
    }

    #[test]
    fn test_cache_typed_get_set() {
        let cache = Cache::new(MemoryStore::new());
        let entry = Entry {
            name: "widget".to_string(),
            count: 3,
        };
        cache.set("entry", &entry).unwrap();

        let loaded: Option<Entry> = cache.get("entry").unwrap();
        assert_eq!(loaded, Some(entry));
    }

    #[test]
    fn test_cache_get_missing() {
        let cache = Cache::new(MemoryStore::new());
        let loaded: Option<Entry> = cache.get("missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_cache_get_malformed_json() {
        let store = MemoryStore::new();
        store.set("entry", "{not json").unwrap();
        let cache = Cache::new(store);

        let result: Result<Option<Entry>, _> = cache.get("entry");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_cache_delete() {
        let cache = Cache::new(MemoryStore::new());
        cache.set("entry", &1u32).unwrap();
        assert!(cache.exists("entry").unwrap());

        cache.delete("entry").unwrap();
        assert!(!cache.exists("entry").unwrap());
    }

    #[test]
    fn test_arc_store_shares_state() {
        let store = Arc::new(MemoryStore::new());
        let cache = Cache::new(Arc::clone(&store));
        cache.set("k", &"v").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("\"v\""));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", "v1"), "cart:v1");
        assert_eq!(cache_key!("cart", "v1", 42), "cart:v1:42");
    }
}
