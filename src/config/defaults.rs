// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{AutosaveConfig, Backend, KdfConfig, StorageConfig};
use crate::consts::{
    DEFAULT_AUTOSAVE_DEBOUNCE_MS, DEFAULT_KDF_ITERATIONS, DEFAULT_LEGACY_KEY, DEFAULT_RECORD_KEY,
};

pub const DEFAULT_CONFIG_FILE: &str = "docuvault.toml";

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docuvault")
        .join("vault.db")
}

pub fn default_storage() -> StorageConfig {
    StorageConfig {
        backend: Backend::Sqlite,
        path: default_db_path(),
        record_key: DEFAULT_RECORD_KEY.into(),
        legacy_key: DEFAULT_LEGACY_KEY.into(),
    }
}

pub fn default_kdf() -> KdfConfig {
    KdfConfig {
        iterations: DEFAULT_KDF_ITERATIONS,
    }
}

pub fn default_autosave() -> AutosaveConfig {
    AutosaveConfig {
        debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
        flush_on_teardown: true,
    }
}

// serde field defaults
pub(crate) fn record_key() -> String {
    DEFAULT_RECORD_KEY.into()
}
pub(crate) fn legacy_key() -> String {
    DEFAULT_LEGACY_KEY.into()
}
pub(crate) fn iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}
pub(crate) fn debounce_ms() -> u64 {
    DEFAULT_AUTOSAVE_DEBOUNCE_MS
}
pub(crate) fn yes() -> bool {
    true
}
