// src/crypto/encrypt.rs
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use crate::consts::{IV_LEN, KEY_LEN};
use crate::error::{Result, VaultError};

/// Output of one AEAD seal: the nonce it used and ciphertext || tag.
pub struct Sealed {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
}

/// Fill an array from the thread-local CSPRNG
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    rand::rng().fill_bytes(&mut out);
    out
}

/// Encrypt plaintext under a 256-bit key → (iv, ciphertext)
///
/// A new random iv is drawn on every call, so an (iv, key) pair is never reused
/// even when the same payload is saved twice.
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_LEN]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::CryptoUnavailable(format!("Invalid key: {e}")))?;

    let iv = random_bytes::<IV_LEN>();
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| VaultError::CryptoUnavailable(format!("Encryption failed: {e}")))?;

    Ok(Sealed { iv, ciphertext })
}
