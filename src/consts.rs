// src/consts.rs
//! Shared constants: security parameters and defaults

/// PBKDF2-HMAC-SHA256 iterations for password / recovery-phrase stretching.
// Matches what existing vault records were written with; an envelope that
// carries no explicit count is assumed to use this.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Lowest iteration count accepted from configuration.
pub const MIN_KDF_ITERATIONS: u32 = 1_000;

/// Highest iteration count accepted from configuration or a stored envelope.
// Bounds unlock time when a record has been tampered with.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

/// Raw master key length (AES-256)
pub const KEY_LEN: usize = 32;

/// Fresh random salt per wrapped-key envelope
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length
pub const IV_LEN: usize = 12;

/// Recovery phrase alphabet, without the easily confused 0/O and 1/I
pub const RECOVERY_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of alphabet symbols in a recovery phrase
pub const RECOVERY_PHRASE_SYMBOLS: usize = 16;

/// Symbols per hyphen-separated group
pub const RECOVERY_GROUP_LEN: usize = 4;

/// Shortest password accepted at setup and on rotation
pub const MIN_PASSWORD_LEN: usize = 4;

/// Storage key holding the one `VaultRecord`
pub const DEFAULT_RECORD_KEY: &str = "docuvault_data";

/// Older storage location migrated on load and removed on reset
pub const DEFAULT_LEGACY_KEY: &str = "docuvault_data_legacy";

/// Quiescence window before an autosave fires
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 500;

/// Current encrypted payload schema
pub const PAYLOAD_SCHEMA_VERSION: u32 = 1;

/// Default file name for the downloadable recovery key
pub const RECOVERY_KIT_FILE_NAME: &str = "docuvault-recovery-key.txt";
