// src/recovery_kit.rs
//! Downloadable recovery key file
//!
//! SECURITY WARNING: the written file holds the recovery phrase in plaintext.
//! Anyone holding it can unlock the vault.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::RECOVERY_KIT_FILE_NAME;
use crate::error::Result;

pub fn render(phrase: &str) -> String {
    format!(
        "DocuVault Recovery Key: {phrase}\n\n\
         KEEP THIS SAFE. IF YOU LOSE YOUR PASSWORD, THIS IS THE ONLY WAY TO RECOVER YOUR DATA."
    )
}

/// `dir/docuvault-recovery-key.txt`
pub fn default_path(dir: &Path) -> PathBuf {
    dir.join(RECOVERY_KIT_FILE_NAME)
}

/// Write the kit to `path`, owner read/write only on Unix. Overwrites.
pub fn write_to<P: AsRef<Path>>(path: P, phrase: &str) -> Result<()> {
    let path = path.as_ref();

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(render(phrase).as_bytes())?;
    file.sync_all()?;

    info!("Recovery key written to {}", path.display());
    Ok(())
}
