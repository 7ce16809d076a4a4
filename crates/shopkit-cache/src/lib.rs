//! Injected key-value storage for ShopKit client state.
//!
//! Client-side state (the cart snapshot, the auth token) is persisted through
//! the [`KeyValueStore`] trait rather than a global storage handle, so tests
//! can swap in a [`MemoryStore`] and native processes can use a [`FileStore`].
//!
//! # Example
//!
//! ```rust
//! use shopkit_cache::{Cache, KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("token", "abc123").unwrap();
//!
//! let cache = Cache::new(store);
//! cache.set("cart:v1", &vec![1, 2, 3]).unwrap();
//! let items: Option<Vec<u32>> = cache.get("cart:v1").unwrap();
//! assert_eq!(items, Some(vec![1, 2, 3]));
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
