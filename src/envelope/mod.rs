// src/envelope/mod.rs
//! Envelope store: constructs and interprets `VaultRecord`s
//!
//! A record holds one content ciphertext and two independently wrapped copies
//! of the same master key: one under the password, one under the recovery
//! phrase. Callers never see which one failed or why; every crypto failure
//! below this boundary becomes [`VaultError::Unlock`].

mod legacy;
mod record;
mod rotate;
mod wrap;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::aliases::MasterKey32;
use crate::crypto::{
    decrypt, encrypt, generate_key, generate_recovery_phrase, is_well_formed_recovery_phrase,
    normalize_recovery_phrase,
};
use crate::error::{Result, VaultError};
use crate::payload::VaultPayload;

pub use legacy::{LegacyReason, LegacyRecord, StoredRecord};
pub use record::{ContentEnvelope, VaultRecord, WrappedKeyEnvelope};
pub use rotate::rotate_password;
pub use wrap::{unwrap_master_key, wrap_master_key};

/// Which wrapped copy of the master key to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Password,
    RecoveryPhrase,
}

impl Credential {
    pub fn from_use_recovery(use_recovery: bool) -> Self {
        if use_recovery {
            Credential::RecoveryPhrase
        } else {
            Credential::Password
        }
    }
}

/// Result of [`create_vault`]: the record to persist plus what the session keeps.
pub struct CreatedVault {
    pub record: VaultRecord,
    pub master_key: MasterKey32,
    pub recovery_phrase: String,
    pub payload: VaultPayload,
}

/// Result of a successful [`unlock`]
pub struct UnlockedVault {
    pub master_key: MasterKey32,
    pub payload: VaultPayload,
}

/// Build a brand-new record. Nothing is returned unless every step succeeds.
pub async fn create_vault(password: &str, iterations: u32) -> Result<CreatedVault> {
    let master_key = generate_key();
    let recovery_phrase = generate_recovery_phrase();

    let auth = wrap_master_key(&master_key, password, iterations).await?;
    let recovery = wrap_master_key(&master_key, &recovery_phrase, iterations).await?;

    let payload = VaultPayload::initial(&recovery_phrase);
    let content = seal_payload(&master_key, &payload)?;

    info!("Created new vault record");
    Ok(CreatedVault {
        record: VaultRecord {
            content,
            auth,
            recovery,
        },
        master_key,
        recovery_phrase,
        payload,
    })
}

/// Open the record with a password or recovery phrase.
///
/// Either both the key unwrap and the content decrypt succeed, or this fails
/// with [`VaultError::Unlock`] and nothing is returned.
pub async fn unlock(record: &VaultRecord, secret: &str, credential: Credential) -> Result<UnlockedVault> {
    let (envelope, secret) = match credential {
        Credential::Password => (&record.auth, Zeroizing::new(secret.to_owned())),
        Credential::RecoveryPhrase => {
            let phrase = normalize_recovery_phrase(secret);
            if !is_well_formed_recovery_phrase(&phrase) {
                debug!("Rejected malformed recovery phrase without deriving");
                return Err(VaultError::Unlock);
            }
            (&record.recovery, Zeroizing::new(phrase))
        }
    };

    let master_key = unwrap_master_key(envelope, &secret)
        .await
        .map_err(into_unlock_error)?;
    let payload = open_payload(&master_key, &record.content)?;

    info!(?credential, "Vault unlocked");
    Ok(UnlockedVault { master_key, payload })
}

/// Replace only `content`, sealing the complete payload under a fresh iv.
pub fn re_encrypt_content(
    record: &VaultRecord,
    master_key: &MasterKey32,
    payload: &VaultPayload,
) -> Result<VaultRecord> {
    let content = seal_payload(master_key, payload)?;
    Ok(VaultRecord {
        content,
        auth: record.auth.clone(),
        recovery: record.recovery.clone(),
    })
}

fn seal_payload(master_key: &MasterKey32, payload: &VaultPayload) -> Result<ContentEnvelope> {
    let plaintext = payload.to_json()?;
    let sealed = encrypt(&plaintext, master_key.expose_secret())?;
    Ok(ContentEnvelope {
        iv: sealed.iv,
        ciphertext: sealed.ciphertext,
    })
}

fn open_payload(master_key: &MasterKey32, content: &ContentEnvelope) -> Result<VaultPayload> {
    let plaintext = decrypt(&content.ciphertext, master_key.expose_secret(), &content.iv)
        .map_err(into_unlock_error)?;

    match VaultPayload::from_json(&plaintext) {
        Ok(payload) => Ok(payload),
        Err(err @ VaultError::SchemaVersion { .. }) => Err(err),
        // Authentic bytes that don't parse are treated like tampering.
        Err(_) => Err(VaultError::Unlock),
    }
}

fn into_unlock_error(err: VaultError) -> VaultError {
    match err {
        VaultError::CryptoUnavailable(_) => err,
        _ => VaultError::Unlock,
    }
}
