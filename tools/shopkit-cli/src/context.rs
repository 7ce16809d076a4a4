//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use shopkit_auth::{AuthSession, UserApi};
use shopkit_cache::FileStore;
use shopkit_commerce::cart::CartSessionManager;
use shopkit_commerce::catalog::{CategoryApi, ProductApi};
use shopkit_commerce::checkout::OrderApi;
use shopkit_data::FetchClient;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, nearest directory first.
pub const CONFIG_NAMES: [&str; 3] = ["shopkit.toml", ".shopkit.toml", "shopkit.json"];

pub type Store = Arc<FileStore>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        tracing::debug!(config = ?config_path, base_url = %config.api.base_url, "Loaded configuration");
        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(&config_path) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "Skipping config file"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Open the state file holding the cart snapshot and auth token.
    pub fn store(&self) -> Result<Store> {
        let path = self.resolve_path(&self.config.state_path());
        let store = FileStore::open(&path)
            .with_context(|| format!("Failed to open state file: {}", path.display()))?;
        Ok(Arc::new(store))
    }

    /// HTTP client for the configured backend.
    pub fn client(&self) -> FetchClient {
        FetchClient::new()
            .with_base_url(self.config.api.base_url.clone())
            .with_timeout(Duration::from_millis(self.config.api.timeout_ms))
    }

    pub fn auth(&self, store: &Store) -> Arc<AuthSession<Store>> {
        Arc::new(AuthSession::new(self.client(), Arc::clone(store)))
    }

    /// Order API authorized with the session token.
    pub fn orders(&self, auth: &Arc<AuthSession<Store>>) -> OrderApi {
        OrderApi::new(self.client()).with_token_source(auth.clone())
    }

    /// Product API; admin calls carry the session token.
    pub fn products(&self, auth: &Arc<AuthSession<Store>>) -> ProductApi {
        ProductApi::new(self.client()).with_token_source(auth.clone())
    }

    pub fn categories(&self) -> CategoryApi {
        CategoryApi::new(self.client())
    }

    pub fn users(&self, auth: &Arc<AuthSession<Store>>) -> UserApi {
        UserApi::new(self.client()).with_token_source(auth.clone())
    }

    /// The persisted cart, checking out as the signed-in user.
    pub fn cart(&self, store: &Store, auth: &Arc<AuthSession<Store>>) -> CartSessionManager<Store> {
        CartSessionManager::builder(Arc::clone(store), Arc::new(self.orders(auth)))
            .config(self.config.cart.clone())
            .identity(auth.clone())
            .load()
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
