// src/config/mod.rs
//! Configuration for docu-vault
//!
//! TOML file + env overrides. Missing file means built-in defaults.

pub use app::{AutosaveConfig, Backend, Config, KdfConfig, StorageConfig};
pub use defaults::{default_db_path, DEFAULT_CONFIG_FILE};

mod app;
mod defaults;
