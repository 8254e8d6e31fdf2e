// src/lib.rs
//! docu-vault: password-protected encrypted document vault
//!
//! Features:
//! - AES-256-GCM content encryption under a random master key
//! - Master key wrapped twice: PBKDF2-HMAC-SHA256 password + recovery phrase
//! - Password rotation without re-encrypting content
//! - Debounced autosave through an async key/value blob store
//! - Full secure-gate integration for key material

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod payload;
pub mod recovery_kit;
pub mod session;
pub mod storage;

// Re-export everything users need at the crate root
pub use aliases::{MasterKey32, Secret, WrappingKey32};
pub use config::Config;
pub use envelope::{create_vault, re_encrypt_content, rotate_password, unlock, Credential, StoredRecord, VaultRecord};
pub use error::{Result, VaultError};
pub use payload::{Document, DocumentVersion, Folder, NewVersion, PayloadError, ReorderPosition, VaultPayload};
pub use session::{SaveStatus, SessionState, VaultSession};
pub use storage::{BlobStore, MemoryStore, SqliteStore};
