// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

use crate::payload::PayloadError;

#[derive(Error, Debug)]
pub enum VaultError {
    /// The platform could not perform a required crypto operation.
    #[error("Crypto unavailable: {0}")]
    CryptoUnavailable(String),

    /// AEAD tag mismatch. Never leaves the envelope layer; see [`VaultError::Unlock`].
    #[error("Authentication failed")]
    Authentication,

    /// Wrong password / recovery phrase, or tampered ciphertext.
    #[error("Incorrect password or recovery key")]
    Unlock,

    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored record predates dual-credential wrapping. Only reset can clear it.
    #[error("Vault uses a legacy format and must be reset")]
    LegacyFormat,

    #[error("Vault not set up")]
    NotSetup,

    #[error("Vault already exists")]
    AlreadyExists,

    #[error("Vault is locked")]
    Locked,

    #[error("Operation not allowed while {actual} (expected {expected})")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Password too short (min {min} characters)")]
    PasswordTooShort { min: usize },

    #[error("Unsupported payload schema version {found} (supported: {supported})")]
    SchemaVersion { found: u32, supported: u32 },

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

impl VaultError {
    /// Stable code for the UI layer to branch on.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::CryptoUnavailable(_) => "CRYPTO_UNAVAILABLE",
            // Surfaces identically to a wrong credential if it ever escapes.
            VaultError::Authentication | VaultError::Unlock => "UNLOCK_FAILED",
            VaultError::Storage(_) => "STORAGE_ERROR",
            VaultError::LegacyFormat => "LEGACY_FORMAT",
            VaultError::NotSetup => "NOT_SETUP",
            VaultError::AlreadyExists => "ALREADY_EXISTS",
            VaultError::Locked => "LOCKED",
            VaultError::InvalidState { .. } => "INVALID_STATE",
            VaultError::PasswordTooShort { .. } => "PASSWORD_TOO_SHORT",
            VaultError::SchemaVersion { .. } => "SCHEMA_VERSION",
            VaultError::Payload(_) => "PAYLOAD_ERROR",
            VaultError::Serialization(_) => "SERIALIZATION_ERROR",
            VaultError::Io(_) => "IO_ERROR",
            VaultError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True when the user should be told "incorrect credential".
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, VaultError::Unlock | VaultError::Authentication)
    }

    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        VaultError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}
