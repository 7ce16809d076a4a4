//! Persisted cart snapshot.
//!
//! The snapshot is two entries in the injected store: the JSON list of
//! lines under the configured key and the epoch-millisecond expiration
//! under `<key>:expires_at`.

use crate::cart::config::CartConfig;
use crate::cart::line::CartLine;
use crate::clock::Clock;
use shopkit_cache::{Cache, CacheError, KeyValueStore};
use std::sync::Arc;

/// What [`SnapshotStore::load`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLoad {
    /// A live snapshot.
    Restored { lines: Vec<CartLine>, expires_at: i64 },
    /// The snapshot was past its expiration and has been removed.
    Expired,
    /// Nothing was stored.
    Missing,
    /// One of the entries was absent or unreadable; removed as stale.
    Corrupt,
}

/// Reads and writes the cart snapshot.
pub struct SnapshotStore<S> {
    cache: Cache<S>,
    clock: Arc<dyn Clock>,
    data_key: String,
    expires_key: String,
    ttl_millis: i64,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S, config: &CartConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: Cache::new(store),
            clock,
            data_key: config.storage_key.clone(),
            expires_key: config.expires_key(),
            ttl_millis: config.ttl_millis(),
        }
    }

    /// Read the snapshot, discarding it if stale.
    pub fn load(&self) -> Result<SnapshotLoad, CacheError> {
        let store = self.cache.store();
        let raw_lines = store.get(&self.data_key)?;
        let raw_expires = store.get(&self.expires_key)?;

        let (raw_lines, raw_expires) = match (raw_lines, raw_expires) {
            (None, None) => return Ok(SnapshotLoad::Missing),
            (Some(lines), Some(expires)) => (lines, expires),
            _ => {
                self.discard()?;
                return Ok(SnapshotLoad::Corrupt);
            }
        };

        let Ok(expires_at) = raw_expires.trim().parse::<i64>() else {
            self.discard()?;
            return Ok(SnapshotLoad::Corrupt);
        };

        if self.clock.now_millis() > expires_at {
            self.discard()?;
            return Ok(SnapshotLoad::Expired);
        }

        match serde_json::from_str::<Vec<CartLine>>(&raw_lines) {
            Ok(lines) => Ok(SnapshotLoad::Restored { lines, expires_at }),
            Err(e) => {
                tracing::debug!(error = %e, "Cart snapshot did not parse");
                self.discard()?;
                Ok(SnapshotLoad::Corrupt)
            }
        }
    }

    /// Write `lines` with a fresh expiration. Returns the new expiration.
    ///
    /// The expiration is written first, so a failed write never leaves
    /// lines behind without one.
    pub fn persist(&self, lines: &[CartLine]) -> Result<i64, CacheError> {
        let expires_at = self.clock.now_millis().saturating_add(self.ttl_millis);
        self.cache
            .store()
            .set(&self.expires_key, &expires_at.to_string())?;
        self.cache.set(&self.data_key, &lines)?;
        Ok(expires_at)
    }

    /// Remove both entries.
    pub fn discard(&self) -> Result<(), CacheError> {
        self.cache.delete(&self.data_key)?;
        self.cache.delete(&self.expires_key)
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }
}
