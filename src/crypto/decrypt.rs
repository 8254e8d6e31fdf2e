// src/crypto/decrypt.rs
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::consts::{IV_LEN, KEY_LEN};
use crate::error::{Result, VaultError};

/// Decrypt AES-GCM ciphertext → plaintext (in-memory)
///
/// Any tag mismatch (wrong key, wrong iv, tampered bytes) is
/// [`VaultError::Authentication`]; there is no other password check.
pub fn decrypt(
    ciphertext: &[u8],
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::CryptoUnavailable(format!("Invalid key: {e}")))?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::Authentication)
}
