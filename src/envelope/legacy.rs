// src/envelope/legacy.rs
//! Load-time classification of whatever sits under the record key
//!
//! Decided exactly once per load. A legacy record exposes nothing but the
//! fact that it needs a reset; no partial operation is attempted on it.

use serde::Deserialize;
use tracing::warn;

use super::record::VaultRecord;

/// Why a stored blob can't be used as a dual-credential record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyReason {
    /// Predates the password-wrapped key
    MissingAuth,
    /// Predates the recovery-phrase-wrapped key
    MissingRecovery,
    /// No encrypted content section
    MissingContent,
    /// Not a JSON object, fields fail to decode, or a key envelope's
    /// iteration count is out of bounds
    Unreadable,
}

/// A record that can only be reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    reason: LegacyReason,
}

impl LegacyRecord {
    pub fn reason(&self) -> LegacyReason {
        self.reason
    }
}

#[derive(Debug)]
pub enum StoredRecord {
    Current(VaultRecord),
    Legacy(LegacyRecord),
}

#[derive(Deserialize)]
struct Shape {
    #[serde(rename = "vaultData")]
    vault_data: Option<serde_json::Value>,
    auth: Option<serde_json::Value>,
    recovery: Option<serde_json::Value>,
}

impl StoredRecord {
    pub fn classify(bytes: &[u8]) -> StoredRecord {
        let legacy = |reason| {
            warn!(?reason, "Legacy vault record detected; reset required");
            StoredRecord::Legacy(LegacyRecord { reason })
        };

        let shape: Shape = match serde_json::from_slice(bytes) {
            Ok(shape) => shape,
            Err(_) => return legacy(LegacyReason::Unreadable),
        };
        if is_absent(&shape.auth) {
            return legacy(LegacyReason::MissingAuth);
        }
        if is_absent(&shape.recovery) {
            return legacy(LegacyReason::MissingRecovery);
        }
        if is_absent(&shape.vault_data) {
            return legacy(LegacyReason::MissingContent);
        }

        match serde_json::from_slice::<VaultRecord>(bytes) {
            Ok(record) if record.iterations_in_bounds() => StoredRecord::Current(record),
            Ok(_) | Err(_) => legacy(LegacyReason::Unreadable),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredRecord::Legacy(_))
    }
}

fn is_absent(value: &Option<serde_json::Value>) -> bool {
    matches!(value, None | Some(serde_json::Value::Null))
}
