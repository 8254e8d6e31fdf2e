// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret-bearing types used throughout docu-vault.
//! Everything declared here zeroizes on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(MasterKey32, 32); // 256-bit AES-GCM data-encryption key (the "master key")
fixed_alias!(WrappingKey32, 32); // PBKDF2 output that wraps the master key

// Dynamic secrets
dynamic_alias!(Secret, String); // password or recovery phrase as typed by the user
