// src/envelope/rotate.rs
//! Password rotation: re-wrap the same master key under a new password.
//!
//! `content` is never touched because the master key does not change, and the
//! recovery-phrase envelope stays byte-identical.

use tracing::info;

use crate::aliases::MasterKey32;
use crate::error::Result;

use super::record::VaultRecord;
use super::wrap::wrap_master_key;

pub async fn rotate_password(
    record: &VaultRecord,
    current_master_key: &MasterKey32,
    new_password: &str,
    iterations: u32,
) -> Result<VaultRecord> {
    let auth = wrap_master_key(current_master_key, new_password, iterations).await?;

    info!("Password envelope rotated");
    Ok(VaultRecord {
        content: record.content.clone(),
        auth,
        recovery: record.recovery.clone(),
    })
}
