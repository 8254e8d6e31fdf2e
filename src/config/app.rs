// src/config/app.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::{self, *};
use crate::consts::{MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_storage")]
    pub storage: StorageConfig,
    #[serde(default = "default_kdf")]
    pub kdf: KdfConfig,
    #[serde(default = "default_autosave")]
    pub autosave: AutosaveConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "backend_default")]
    pub backend: Backend,
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "defaults::record_key")]
    pub record_key: String,
    #[serde(default = "defaults::legacy_key")]
    pub legacy_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KdfConfig {
    #[serde(default = "defaults::iterations")]
    pub iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "defaults::debounce_ms")]
    pub debounce_ms: u64,
    /// Write a pending edit on close instead of dropping it.
    #[serde(default = "defaults::yes")]
    pub flush_on_teardown: bool,
}

fn backend_default() -> Backend {
    Backend::Sqlite
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: default_storage(),
            kdf: default_kdf(),
            autosave: default_autosave(),
        }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load from `$DOCUVAULT_CONFIG` (default `docuvault.toml`), then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("DOCUVAULT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut conf = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            warn!("{} not found, using built-in defaults", config_path);
            Config::default()
        };

        if let Ok(db) = std::env::var("DOCUVAULT_DB") {
            conf.storage.path = PathBuf::from(db);
        }
        if let Ok(raw) = std::env::var("DOCUVAULT_KDF_ITERATIONS") {
            conf.kdf.iterations = raw
                .trim()
                .parse()
                .map_err(|_| VaultError::Config(format!("DOCUVAULT_KDF_ITERATIONS: not a number: {raw}")))?;
        }

        conf.validate()?;
        debug!(backend = ?conf.storage.backend, "Configuration loaded");
        Ok(conf)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let conf: Config = toml::from_str(content).map_err(|e| VaultError::Config(e.to_string()))?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS).contains(&self.kdf.iterations) {
            return Err(VaultError::Config(format!(
                "kdf.iterations must be between {MIN_KDF_ITERATIONS} and {MAX_KDF_ITERATIONS} (got {})",
                self.kdf.iterations
            )));
        }
        if self.storage.record_key.is_empty() {
            return Err(VaultError::Config("storage.record_key must not be empty".into()));
        }
        if self.storage.record_key == self.storage.legacy_key {
            return Err(VaultError::Config(
                "storage.record_key and storage.legacy_key must differ".into(),
            ));
        }
        Ok(())
    }
}
