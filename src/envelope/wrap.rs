// src/envelope/wrap.rs
//! Wrapping the master key under a human secret, and back

use tracing::{debug, warn};

use crate::aliases::MasterKey32;
use crate::crypto::{decrypt, derive_key_async, encrypt, export_key_raw, import_key_raw, new_salt};
use crate::error::{Result, VaultError};

use super::record::WrappedKeyEnvelope;

/// Seal `master` under a key derived from `secret` with a fresh salt.
pub async fn wrap_master_key(
    master: &MasterKey32,
    secret: &str,
    iterations: u32,
) -> Result<WrappedKeyEnvelope> {
    let salt = new_salt();
    let wrapping = derive_key_async(secret, salt, iterations).await?;
    let sealed = encrypt(export_key_raw(master), wrapping.expose_secret())?;

    Ok(WrappedKeyEnvelope {
        salt,
        iv: sealed.iv,
        ciphertext: sealed.ciphertext,
        iterations,
    })
}

/// Recover the master key from one envelope.
///
/// Returns [`VaultError::Authentication`] on a wrong secret or an envelope
/// whose iteration count is out of bounds; the caller maps it.
pub async fn unwrap_master_key(envelope: &WrappedKeyEnvelope, secret: &str) -> Result<MasterKey32> {
    if !envelope.iterations_in_bounds() {
        warn!(
            iterations = envelope.iterations,
            "Refusing key envelope with out-of-bounds iteration count"
        );
        return Err(VaultError::Authentication);
    }
    let wrapping = derive_key_async(secret, envelope.salt, envelope.iterations).await?;
    let raw = decrypt(&envelope.ciphertext, wrapping.expose_secret(), &envelope.iv)?;

    // Authentic but the wrong size: the writer was broken, not the secret.
    let key = import_key_raw(&raw).map_err(|_| VaultError::Authentication)?;
    debug!("Unwrapped master key");
    Ok(key)
}
