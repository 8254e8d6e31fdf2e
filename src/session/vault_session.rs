// src/session/vault_session.rs
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::autosave::{Autosave, SaveStatus, SaveTarget};
use super::state::SessionState;
use crate::aliases::MasterKey32;
use crate::config::{Backend, Config};
use crate::consts::MIN_PASSWORD_LEN;
use crate::envelope::{
    self, create_vault, re_encrypt_content, rotate_password, Credential, StoredRecord, VaultRecord,
};
use crate::error::{Result, VaultError};
use crate::payload::{PayloadError, VaultPayload};
use crate::storage::{BlobStore, MemoryStore, SqliteStore};

/// Everything that exists only while the vault is open.
struct OpenVault {
    record: VaultRecord,
    master_key: MasterKey32,
    payload: VaultPayload,
}

struct Inner {
    state: SessionState,
    /// Loaded record while `Locked`.
    stored: Option<VaultRecord>,
    open: Option<OpenVault>,
    /// Unlocked with the recovery phrase; the password must be changed first.
    recovery_session: bool,
    /// Shown once between setup and acknowledgement.
    new_phrase: Option<String>,
    /// Where `cancel_reset` goes back to.
    before_reset: Option<SessionState>,
}

impl Inner {
    fn require(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.wrong_state(expected))
        }
    }

    fn wrong_state(&self, expected: SessionState) -> VaultError {
        match self.state {
            SessionState::LegacyRequiresReset => VaultError::LegacyFormat,
            SessionState::Setup if expected != SessionState::Setup => VaultError::NotSetup,
            SessionState::Locked if expected == SessionState::Unlocked => VaultError::Locked,
            actual => VaultError::InvalidState {
                expected: expected.name(),
                actual: actual.name(),
            },
        }
    }

    fn clear(&mut self) {
        // master key zeroizes on drop
        self.open = None;
        self.stored = None;
        self.recovery_session = false;
        self.new_phrase = None;
        self.before_reset = None;
    }
}

/// State shared with the autosave worker.
struct Shared {
    store: Arc<dyn BlobStore>,
    record_key: String,
    legacy_key: String,
    inner: Mutex<Inner>,
}

#[async_trait]
impl SaveTarget for Shared {
    async fn save(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let Some(open) = inner.open.as_mut() else {
            debug!("Nothing open; autosave skipped");
            return Ok(());
        };

        // Built from the latest record, so a rotation that landed first is kept.
        let record = re_encrypt_content(&open.record, &open.master_key, &open.payload)?;
        self.store.put(&self.record_key, record.to_bytes()?).await?;
        open.record = record;
        Ok(())
    }
}

/// The running vault: one per process, passed to whatever needs it.
///
/// Call [`VaultSession::close`] to tear it down; that is where a pending
/// autosave is flushed (or dropped) and the master key is cleared.
pub struct VaultSession {
    shared: Arc<Shared>,
    autosave: Autosave,
    config: Config,
}

impl VaultSession {
    /// Build the store named by `config.storage` and open it.
    pub async fn from_config(config: Config) -> Result<Self> {
        match config.storage.backend {
            Backend::Sqlite => {
                let store = SqliteStore::open(&config.storage.path)?;
                Self::open(store, config).await
            }
            Backend::Memory => Self::open(MemoryStore::new(), config).await,
        }
    }

    /// Load the record once and decide the starting state.
    pub async fn open<S: BlobStore>(store: S, config: Config) -> Result<Self> {
        config.validate()?;
        let store: Arc<dyn BlobStore> = Arc::new(store);
        let record_key = config.storage.record_key.clone();
        let legacy_key = config.storage.legacy_key.clone();

        let bytes = load_with_migration(store.as_ref(), &record_key, &legacy_key).await?;

        let (state, stored) = match bytes.as_deref().map(StoredRecord::classify) {
            None => (SessionState::Setup, None),
            Some(StoredRecord::Current(record)) => (SessionState::Locked, Some(record)),
            Some(StoredRecord::Legacy(legacy)) => {
                debug!(reason = ?legacy.reason(), "Session starts in legacy state");
                (SessionState::LegacyRequiresReset, None)
            }
        };
        info!(%state, "Vault session opened");

        let shared = Arc::new(Shared {
            store,
            record_key,
            legacy_key,
            inner: Mutex::new(Inner {
                state,
                stored,
                open: None,
                recovery_session: false,
                new_phrase: None,
                before_reset: None,
            }),
        });

        let autosave = Autosave::spawn(
            Arc::clone(&shared) as Arc<dyn SaveTarget>,
            config.autosave.debounce(),
            config.autosave.flush_on_teardown,
        );

        Ok(Self {
            shared,
            autosave,
            config,
        })
    }

    pub async fn state(&self) -> SessionState {
        self.shared.inner.lock().await.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create and persist a new vault. Returns the recovery phrase to show once.
    pub async fn setup(&self, password: &str) -> Result<String> {
        let mut inner = self.shared.inner.lock().await;
        inner.require(SessionState::Setup).map_err(|err| match inner.state {
            SessionState::Locked | SessionState::Unlocked => VaultError::AlreadyExists,
            _ => err,
        })?;
        check_password(password)?;

        let created = create_vault(password, self.config.kdf.iterations).await?;
        // Nothing is kept unless the record actually reached storage.
        self.shared
            .store
            .put(&self.shared.record_key, created.record.to_bytes()?)
            .await?;

        inner.open = Some(OpenVault {
            record: created.record,
            master_key: created.master_key,
            payload: created.payload,
        });
        inner.new_phrase = Some(created.recovery_phrase.clone());
        inner.state = SessionState::AwaitingRecoveryKeyAck;
        info!("Vault set up; awaiting recovery key acknowledgement");
        Ok(created.recovery_phrase)
    }

    pub async fn acknowledge_recovery_key(&self) -> Result<()> {
        let mut inner = self.shared.inner.lock().await;
        inner.require(SessionState::AwaitingRecoveryKeyAck)?;
        inner.new_phrase = None;
        inner.state = SessionState::Unlocked;
        info!("Recovery key acknowledged");
        Ok(())
    }

    /// Boolean unlock for the login screen. Use [`VaultSession::try_unlock`] to see why.
    pub async fn unlock(&self, secret: &str, use_recovery: bool) -> bool {
        match self.try_unlock(secret, use_recovery).await {
            Ok(()) => true,
            Err(err) => {
                debug!(code = err.code(), "Unlock attempt failed");
                false
            }
        }
    }

    pub async fn try_unlock(&self, secret: &str, use_recovery: bool) -> Result<()> {
        let mut inner = self.shared.inner.lock().await;
        inner.require(SessionState::Locked)?;
        let record = inner.stored.as_ref().ok_or(VaultError::NotSetup)?;

        let unlocked = envelope::unlock(record, secret, Credential::from_use_recovery(use_recovery)).await?;

        let record = inner.stored.take().ok_or(VaultError::NotSetup)?;
        inner.open = Some(OpenVault {
            record,
            master_key: unlocked.master_key,
            payload: unlocked.payload,
        });
        inner.recovery_session = use_recovery;
        inner.state = SessionState::Unlocked;
        if use_recovery {
            info!("Unlocked with recovery key; password change required");
        }
        Ok(())
    }

    pub async fn requires_password_change(&self) -> bool {
        self.shared.inner.lock().await.recovery_session
    }

    /// Re-wrap the master key under `new_password` and persist. Content and the
    /// recovery envelope are untouched.
    pub async fn change_password(&self, new_password: &str) -> Result<()> {
        check_password(new_password)?;

        let mut inner = self.shared.inner.lock().await;
        inner.require(SessionState::Unlocked)?;
        let open = inner.open.as_mut().ok_or(VaultError::Locked)?;

        let record = rotate_password(&open.record, &open.master_key, new_password, self.config.kdf.iterations)
            .await?;
        self.shared
            .store
            .put(&self.shared.record_key, record.to_bytes()?)
            .await?;
        open.record = record;

        inner.recovery_session = false;
        info!("Password changed");
        Ok(())
    }

    /// Apply a payload mutation and schedule an autosave.
    ///
    /// A mutation that fails leaves nothing to save, so no save is scheduled.
    pub async fn update<F, R>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut VaultPayload) -> std::result::Result<R, PayloadError>,
    {
        let out = {
            let mut inner = self.shared.inner.lock().await;
            inner.require(SessionState::Unlocked)?;
            if inner.recovery_session {
                return Err(VaultError::InvalidState {
                    expected: "password changed",
                    actual: "recovery session",
                });
            }
            let open = inner.open.as_mut().ok_or(VaultError::Locked)?;
            mutate(&mut open.payload)?
        };

        self.autosave.touch();
        Ok(out)
    }

    /// Snapshot of the decrypted payload.
    pub async fn payload(&self) -> Result<VaultPayload> {
        let inner = self.shared.inner.lock().await;
        inner.require(SessionState::Unlocked)?;
        let open = inner.open.as_ref().ok_or(VaultError::Locked)?;
        Ok(open.payload.clone())
    }

    pub async fn recovery_phrase(&self) -> Result<Option<String>> {
        let inner = self.shared.inner.lock().await;
        match inner.state {
            SessionState::AwaitingRecoveryKeyAck => Ok(inner.new_phrase.clone()),
            SessionState::Unlocked => Ok(inner
                .open
                .as_ref()
                .and_then(|open| open.payload.recovery_phrase.clone())),
            _ => Err(inner.wrong_state(SessionState::Unlocked)),
        }
    }

    pub async fn request_reset(&self) -> Result<()> {
        let mut inner = self.shared.inner.lock().await;
        if !inner.state.can_request_reset() {
            return Err(VaultError::InvalidState {
                expected: "setup, locked or legacy",
                actual: inner.state.name(),
            });
        }
        inner.before_reset = Some(inner.state);
        inner.state = SessionState::ResettingConfirm;
        Ok(())
    }

    pub async fn cancel_reset(&self) -> Result<()> {
        let mut inner = self.shared.inner.lock().await;
        inner.require(SessionState::ResettingConfirm)?;
        let previous = inner.before_reset.take().unwrap_or(SessionState::Locked);
        inner.state = previous;
        Ok(())
    }

    /// Delete the record and the legacy location, clear memory, go back to `Setup`.
    ///
    /// A storage failure is returned and the session stays in `ResettingConfirm`.
    pub async fn confirm_reset(&self) -> Result<()> {
        // Check before cancelling so a stray call can't discard a pending save.
        // The guard is released first because the worker locks `inner` to save.
        self.shared.inner.lock().await.require(SessionState::ResettingConfirm)?;
        self.autosave.cancel().await?;

        let mut inner = self.shared.inner.lock().await;
        inner.require(SessionState::ResettingConfirm)?;

        self.shared.store.delete(&self.shared.record_key).await?;
        self.shared.store.delete(&self.shared.legacy_key).await?;

        inner.clear();
        inner.state = SessionState::Setup;
        warn!("Vault reset; all stored data deleted");
        Ok(())
    }

    /// Save a pending edit now.
    pub async fn flush(&self) -> Result<()> {
        self.autosave.flush().await
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.subscribe()
    }

    /// Tear down the session and clear key material.
    ///
    /// With `autosave.flush_on_teardown` a pending edit is written first and a
    /// failed write is returned; without it the edit is discarded.
    pub async fn close(self) -> Result<()> {
        let result = self
            .autosave
            .shutdown(self.config.autosave.flush_on_teardown)
            .await;

        let mut inner = self.shared.inner.lock().await;
        inner.clear();
        inner.state = SessionState::Locked;
        info!("Vault session closed");
        result
    }
}

fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(VaultError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Read the record, moving it from the legacy location if only that one exists.
async fn load_with_migration(
    store: &dyn BlobStore,
    record_key: &str,
    legacy_key: &str,
) -> Result<Option<Vec<u8>>> {
    if let Some(bytes) = store.get(record_key).await? {
        return Ok(Some(bytes));
    }

    match store.get(legacy_key).await? {
        Some(bytes) => {
            store.put(record_key, bytes.clone()).await?;
            store.delete(legacy_key).await?;
            info!("Moved vault record from legacy storage location");
            Ok(Some(bytes))
        }
        None => Ok(None),
    }
}
