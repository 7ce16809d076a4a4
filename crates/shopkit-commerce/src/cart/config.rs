//! Cart configuration.

use crate::money::Currency;
use serde::{Deserialize, Serialize};
use shopkit_cache::cache_key;
use std::time::Duration;

/// Default storage key for the cart lines.
pub const DEFAULT_STORAGE_KEY: &str = "app_cart_v1";

/// Default sliding expiration: seven days.
pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Where and for how long the cart snapshot is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Key holding the serialized lines. The expiration lives next to it.
    pub storage_key: String,
    /// Sliding expiration window in seconds.
    pub ttl_secs: u64,
    /// Currency every line must be priced in.
    pub currency: Currency,
}

impl CartConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl().as_millis()).unwrap_or(i64::MAX)
    }

    /// Key holding the expiration timestamp.
    pub fn expires_key(&self) -> String {
        cache_key!(self.storage_key.as_str(), "expires_at")
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
            currency: Currency::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "app_cart_v1");
        assert_eq!(config.expires_key(), "app_cart_v1:expires_at");
        assert_eq!(config.ttl_millis(), 604_800_000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CartConfig = serde_json::from_str(r#"{"ttl_secs": 60}"#).unwrap();
        assert_eq!(config.ttl_secs, 60);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }
}
