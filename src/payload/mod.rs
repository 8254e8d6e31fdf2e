// src/payload/mod.rs
//! Versioned plaintext schema sealed inside the `ContentEnvelope`
//!
//! The envelope layer only ever sees `VaultPayload` as JSON bytes; the
//! document/folder model lives in [`model`] so the crypto boundary stays
//! agnostic to its shape beyond the schema version.

pub mod model;
mod sample;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::consts::PAYLOAD_SCHEMA_VERSION;
use crate::error::{Result, VaultError};

pub use model::{Document, DocumentVersion, Folder, NewVersion, ReorderPosition};
pub use sample::sample_documents;

/// Errors from document/folder mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Document not found: {0}")]
    UnknownDocument(String),

    #[error("Folder not found: {0}")]
    UnknownFolder(String),

    #[error("A folder cannot be moved into itself or one of its subfolders")]
    CircularMove,
}

/// Everything the vault protects: documents, folders, and the recovery
/// phrase (kept so it can be shown again after unlock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPayload {
    // Payloads written before versioning carry no tag; they are version 1.
    #[serde(default = "unversioned_schema")]
    pub schema_version: u32,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub recovery_phrase: Option<String>,
}

fn unversioned_schema() -> u32 {
    1
}

impl Default for VaultPayload {
    fn default() -> Self {
        Self {
            schema_version: PAYLOAD_SCHEMA_VERSION,
            documents: Vec::new(),
            folders: Vec::new(),
            recovery_phrase: None,
        }
    }
}

impl VaultPayload {
    /// Content of a freshly created vault
    pub fn initial(recovery_phrase: &str) -> Self {
        Self {
            documents: sample_documents(),
            recovery_phrase: Some(recovery_phrase.to_owned()),
            ..Self::default()
        }
    }

    /// Serialize the complete payload; no partial or delta encoding exists.
    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(serde_json::to_vec(self)?))
    }

    /// Parse decrypted bytes, rejecting schemas newer than this build understands.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;

        let found = match value.get("schemaVersion") {
            None | Some(serde_json::Value::Null) => unversioned_schema(),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(VaultError::SchemaVersion {
                    found: u32::MAX,
                    supported: PAYLOAD_SCHEMA_VERSION,
                })?,
        };
        if found > PAYLOAD_SCHEMA_VERSION {
            return Err(VaultError::SchemaVersion {
                found,
                supported: PAYLOAD_SCHEMA_VERSION,
            });
        }

        let mut payload: VaultPayload = serde_json::from_value(value)?;
        payload.schema_version = PAYLOAD_SCHEMA_VERSION;
        Ok(payload)
    }
}
