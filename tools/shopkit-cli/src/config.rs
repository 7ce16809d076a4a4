//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shopkit_commerce::cart::CartConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Cart storage key, expiration and currency.
    #[serde(default)]
    pub cart: CartConfig,

    /// Local state file.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Where the state file lives: the configured path, else the user data dir.
    pub fn state_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| data_dir().join("shopkit").join("state.json"))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every API path is joined to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Local state file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file path. Defaults to `~/.local/share/shopkit/state.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Get the platform-specific data directory.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}

/// Generate a default shopkit.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# ShopKit storefront client configuration

[api]
base_url = "{base_url}"
timeout_ms = 10000

[cart]
storage_key = "app_cart_v1"
# Sliding expiration, refreshed on every cart change (7 days).
ttl_secs = 604800
currency = "USD"

[storage]
# path = ".shopkit/state.json"
"#
    )
}
