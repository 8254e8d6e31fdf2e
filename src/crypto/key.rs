// src/crypto/key.rs
//! Master key generation and raw round-tripping

use zeroize::Zeroize;

use crate::aliases::MasterKey32;
use crate::consts::KEY_LEN;
use crate::error::{Result, VaultError};

use super::encrypt::random_bytes;

/// Generate a new random 256-bit master key
pub fn generate_key() -> MasterKey32 {
    let mut bytes = random_bytes::<KEY_LEN>();
    let key = MasterKey32::new(bytes);
    bytes.zeroize();
    key
}

/// Raw key bytes, ready to be wrapped as plaintext
pub fn export_key_raw(key: &MasterKey32) -> &[u8; KEY_LEN] {
    key.expose_secret()
}

/// Rebuild a master key from unwrapped bytes
pub fn import_key_raw(raw: &[u8]) -> Result<MasterKey32> {
    let mut bytes: [u8; KEY_LEN] = raw.try_into().map_err(|_| {
        VaultError::CryptoUnavailable(format!(
            "Invalid raw key length: expected {KEY_LEN}, got {}",
            raw.len()
        ))
    })?;
    let key = MasterKey32::new(bytes);
    bytes.zeroize();
    Ok(key)
}
