// src/crypto/kdf.rs
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::aliases::WrappingKey32;
use crate::consts::{KEY_LEN, SALT_LEN};
use crate::error::{Result, VaultError};

use super::encrypt::random_bytes;

/// Fresh random salt, one per wrapped-key envelope
pub fn new_salt() -> [u8; SALT_LEN] {
    random_bytes::<SALT_LEN>()
}

/// Stretch a human secret into a 256-bit wrapping key.
///
/// Deterministic for identical `(secret, salt, iterations)`.
pub fn derive_key(secret: &str, salt: &[u8; SALT_LEN], iterations: u32) -> Result<WrappingKey32> {
    if iterations == 0 {
        return Err(VaultError::CryptoUnavailable(
            "PBKDF2 requires at least one iteration".into(),
        ));
    }

    let mut out = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, iterations, &mut out);
    let key = WrappingKey32::new(out);
    out.zeroize();

    debug!(iterations, "Derived {}-byte wrapping key", KEY_LEN);
    Ok(key)
}

/// [`derive_key`] on the blocking pool so the session's executor keeps running.
pub async fn derive_key_async(
    secret: &str,
    salt: [u8; SALT_LEN],
    iterations: u32,
) -> Result<WrappingKey32> {
    let secret = Zeroizing::new(secret.to_owned());
    tokio::task::spawn_blocking(move || derive_key(&secret, &salt, iterations))
        .await
        .map_err(|e| VaultError::CryptoUnavailable(format!("Key derivation task failed: {e}")))?
}
