// src/crypto/mod.rs
//! Pure cryptographic primitives (no I/O, no storage)
//!
//! All functions work exclusively on in-memory buffers:
//! - PBKDF2-HMAC-SHA256 stretching of human secrets
//! - AES-256-GCM with a fresh random 96-bit nonce per call
//! - raw master-key export/import so a key can itself be wrapped
//! - recovery phrase generation
mod decrypt;
mod encrypt;
mod kdf;
mod key;
mod phrase;

pub use decrypt::decrypt;
pub use encrypt::{encrypt, random_bytes, Sealed};
pub use kdf::{derive_key, derive_key_async, new_salt};
pub use key::{export_key_raw, generate_key, import_key_raw};
pub use phrase::{generate_recovery_phrase, is_well_formed_recovery_phrase, normalize_recovery_phrase};
