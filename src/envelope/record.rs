// src/envelope/record.rs
//! On-disk record format
//!
//! ```json
//! {
//!   "vaultData": { "iv": base64, "data": base64 },
//!   "auth":      { "salt": base64, "iv": base64, "data": base64 },
//!   "recovery":  { "salt": base64, "iv": base64, "data": base64 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_KDF_ITERATIONS, IV_LEN, MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS, SALT_LEN,
};
use crate::error::Result;

/// The master key sealed under a key derived from one human secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKeyEnvelope {
    #[serde(with = "b64")]
    pub salt: [u8; SALT_LEN],
    #[serde(with = "b64")]
    pub iv: [u8; IV_LEN],
    #[serde(rename = "data", with = "b64")]
    pub ciphertext: Vec<u8>,
    // Records written before the count was configurable don't carry it.
    #[serde(
        default = "default_iterations",
        skip_serializing_if = "is_default_iterations"
    )]
    pub iterations: u32,
}

/// The serialized payload sealed under the master key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEnvelope {
    #[serde(with = "b64")]
    pub iv: [u8; IV_LEN],
    #[serde(rename = "data", with = "b64")]
    pub ciphertext: Vec<u8>,
}

/// The one persisted aggregate. Replaced wholesale on every write.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    #[serde(rename = "vaultData")]
    pub content: ContentEnvelope,
    pub auth: WrappedKeyEnvelope,
    pub recovery: WrappedKeyEnvelope,
}

impl WrappedKeyEnvelope {
    /// Whether the stored count lies in `MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS`.
    pub fn iterations_in_bounds(&self) -> bool {
        (MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS).contains(&self.iterations)
    }
}

impl VaultRecord {
    /// Both key envelopes carry a usable iteration count.
    pub fn iterations_in_bounds(&self) -> bool {
        self.auth.iterations_in_bounds() && self.recovery.iterations_in_bounds()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

// Ciphertext is opaque but still not something to splat into logs.
impl std::fmt::Debug for WrappedKeyEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedKeyEnvelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ContentEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentEnvelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for VaultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultRecord")
            .field("content", &self.content)
            .field("auth", &self.auth)
            .field("recovery", &self.recovery)
            .finish()
    }
}

fn default_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

fn is_default_iterations(n: &u32) -> bool {
    *n == DEFAULT_KDF_ITERATIONS
}

/// Standard base64 for byte fields, with length checks for fixed arrays.
mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        let text = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(text.as_bytes()).map_err(D::Error::custom)?;
        let len = bytes.len();
        T::try_from(bytes).map_err(|_| D::Error::custom(format!("unexpected field length {len}")))
    }
}
