// tests/session_tests.rs
mod common;
mod support;

use std::sync::Arc;

use docu_vault::consts::{DEFAULT_LEGACY_KEY, DEFAULT_RECORD_KEY};
use docu_vault::envelope::{create_vault, Credential};
use docu_vault::{BlobStore, Config, SessionState, VaultError, VaultSession};
use support::{fast_config, matches_phrase_pattern, CountingStore, FailingStore, FAST_ITERATIONS};

const PASSWORD: &str = "correct-horse";

/// Fresh store with a vault set up and acknowledged; the session is closed.
async fn provisioned() -> (Arc<CountingStore>, String) {
    let store = CountingStore::new();
    let session = VaultSession::open(Arc::clone(&store), fast_config()).await.unwrap();
    let phrase = session.setup(PASSWORD).await.unwrap();
    session.acknowledge_recovery_key().await.unwrap();
    session.close().await.unwrap();
    (store, phrase)
}

async fn reopen(store: &Arc<CountingStore>) -> VaultSession {
    VaultSession::open(Arc::clone(store), fast_config()).await.unwrap()
}

#[tokio::test]
async fn test_setup_flow_persists_before_ack() {
    common::setup();
    let store = CountingStore::new();
    let session = VaultSession::open(Arc::clone(&store), fast_config()).await.unwrap();
    assert_eq!(session.state().await, SessionState::Setup);

    let phrase = session.setup(PASSWORD).await.unwrap();
    assert!(matches_phrase_pattern(&phrase));
    assert_eq!(session.state().await, SessionState::AwaitingRecoveryKeyAck);
    assert_eq!(store.puts(), 1);
    assert_eq!(session.recovery_phrase().await.unwrap().as_deref(), Some(phrase.as_str()));

    // not usable until the phrase is acknowledged
    assert!(session.payload().await.is_err());
    assert!(session.update(|p| p.create_folder("x", None)).await.is_err());

    session.acknowledge_recovery_key().await.unwrap();
    assert_eq!(session.state().await, SessionState::Unlocked);
    assert_eq!(session.payload().await.unwrap().documents.len(), 2);
    assert_eq!(session.recovery_phrase().await.unwrap().as_deref(), Some(phrase.as_str()));

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_setup_rejects_short_password() {
    let session = VaultSession::open(CountingStore::new(), fast_config()).await.unwrap();
    let err = session.setup("abc").await.unwrap_err();
    assert!(matches!(err, VaultError::PasswordTooShort { min: 4 }));
    assert_eq!(session.state().await, SessionState::Setup);
}

#[tokio::test]
async fn test_setup_when_vault_exists_fails() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;
    assert!(matches!(session.setup(PASSWORD).await, Err(VaultError::AlreadyExists)));
}

#[tokio::test]
async fn test_setup_storage_failure_keeps_nothing() {
    let store = CountingStore::new();
    store.set_fail_puts(true);
    let session = VaultSession::open(Arc::clone(&store), fast_config()).await.unwrap();

    let err = session.setup(PASSWORD).await.unwrap_err();
    assert!(matches!(err, VaultError::Storage(_)));
    assert!(!err.is_credential_failure());
    assert_eq!(session.state().await, SessionState::Setup);
    assert!(store.raw(DEFAULT_RECORD_KEY).await.is_none());

    store.set_fail_puts(false);
    session.setup(PASSWORD).await.unwrap();
    assert_eq!(session.state().await, SessionState::AwaitingRecoveryKeyAck);
}

#[tokio::test]
async fn test_open_with_unreachable_storage_fails() {
    let err = VaultSession::open(FailingStore, fast_config()).await.err().unwrap();
    assert!(matches!(err, VaultError::Storage(_)));
}

#[tokio::test]
async fn test_scenario_unlock_by_password_and_recovery() {
    let (store, phrase) = provisioned().await;

    let session = reopen(&store).await;
    assert_eq!(session.state().await, SessionState::Locked);
    assert!(!session.unlock("wrong-password", false).await);
    assert_eq!(session.state().await, SessionState::Locked);
    assert!(session.unlock(PASSWORD, false).await);
    assert!(!session.requires_password_change().await);
    let by_password = session.payload().await.unwrap();
    session.close().await.unwrap();

    let session = reopen(&store).await;
    assert!(session.unlock(&phrase, true).await);
    let by_phrase = session.payload().await.unwrap();
    session.close().await.unwrap();

    assert_eq!(by_password.documents, by_phrase.documents);
    assert_eq!(by_password.folders, by_phrase.folders);
}

#[tokio::test]
async fn test_try_unlock_reports_typed_errors() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;

    let err = session.try_unlock("wrong-password", false).await.unwrap_err();
    assert!(err.is_credential_failure());
    let err = session.try_unlock("not-a-phrase", true).await.unwrap_err();
    assert!(matches!(err, VaultError::Unlock));

    let empty = VaultSession::open(CountingStore::new(), fast_config()).await.unwrap();
    assert!(matches!(empty.try_unlock(PASSWORD, false).await, Err(VaultError::NotSetup)));
}

#[tokio::test]
async fn test_payload_is_refused_while_locked() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;
    assert!(matches!(session.payload().await, Err(VaultError::Locked)));
    assert!(matches!(
        session.update(|p| p.create_folder("x", None)).await,
        Err(VaultError::Locked)
    ));
}

#[tokio::test]
async fn test_recovery_session_forces_password_change() {
    let (store, phrase) = provisioned().await;
    let recovery_before = store.record(DEFAULT_RECORD_KEY).await.recovery;

    let session = reopen(&store).await;
    assert!(session.unlock(&phrase.to_lowercase(), true).await);
    assert!(session.requires_password_change().await);

    let err = session.update(|p| p.create_folder("x", None)).await.unwrap_err();
    assert!(matches!(err, VaultError::InvalidState { .. }));
    // reading is still allowed
    assert!(session.payload().await.is_ok());

    session.change_password("brand-new-pw").await.unwrap();
    assert!(!session.requires_password_change().await);
    session.update(|p| p.create_folder("after", None)).await.unwrap();
    session.close().await.unwrap();

    let record = store.record(DEFAULT_RECORD_KEY).await;
    assert_eq!(record.recovery, recovery_before);

    let session = reopen(&store).await;
    assert!(!session.unlock(PASSWORD, false).await);
    assert!(session.unlock("brand-new-pw", false).await);
    let folders = session.payload().await.unwrap().folders;
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].name, "after");
}

#[tokio::test]
async fn test_scenario_rotate_a_to_b() {
    let store = CountingStore::new();
    let session = VaultSession::open(Arc::clone(&store), fast_config()).await.unwrap();
    let phrase = session.setup("password-a").await.unwrap();
    session.acknowledge_recovery_key().await.unwrap();
    session.change_password("password-b").await.unwrap();
    session.close().await.unwrap();

    let session = reopen(&store).await;
    assert!(!session.unlock("password-a", false).await);
    assert!(session.unlock("password-b", false).await);
    session.close().await.unwrap();

    let session = reopen(&store).await;
    assert!(session.unlock(&phrase, true).await);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_change_password_storage_failure_keeps_old_password() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;
    assert!(session.unlock(PASSWORD, false).await);

    store.set_fail_puts(true);
    let err = session.change_password("password-b").await.unwrap_err();
    assert!(matches!(err, VaultError::Storage(_)));
    store.set_fail_puts(false);
    session.close().await.unwrap();

    let session = reopen(&store).await;
    assert!(session.unlock(PASSWORD, false).await);
}

#[tokio::test]
async fn test_change_password_validates_length() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;
    assert!(session.unlock(PASSWORD, false).await);
    assert!(matches!(
        session.change_password("no").await,
        Err(VaultError::PasswordTooShort { .. })
    ));
}

#[tokio::test]
async fn test_reset_is_irreversible() {
    let (store, phrase) = provisioned().await;
    let old_record = store.record(DEFAULT_RECORD_KEY).await;
    store.put(DEFAULT_LEGACY_KEY, b"stale".to_vec()).await.unwrap();

    let session = reopen(&store).await;
    assert!(!session.unlock("forgot-it", false).await);
    session.request_reset().await.unwrap();
    assert_eq!(session.state().await, SessionState::ResettingConfirm);
    session.confirm_reset().await.unwrap();
    assert_eq!(session.state().await, SessionState::Setup);

    assert!(store.raw(DEFAULT_RECORD_KEY).await.is_none());
    assert!(store.raw(DEFAULT_LEGACY_KEY).await.is_none());
    assert!(matches!(session.try_unlock(PASSWORD, false).await, Err(VaultError::NotSetup)));
    assert!(!session.unlock(&phrase, true).await);

    let new_phrase = session.setup(PASSWORD).await.unwrap();
    assert_ne!(new_phrase, phrase);
    session.acknowledge_recovery_key().await.unwrap();
    session.close().await.unwrap();

    // same password, unrelated key: the old content no longer opens with it
    let new_record = store.record(DEFAULT_RECORD_KEY).await;
    assert_ne!(new_record.auth.salt, old_record.auth.salt);
    let old_key = docu_vault::envelope::unwrap_master_key(&old_record.auth, PASSWORD)
        .await
        .unwrap();
    let new_key = docu_vault::envelope::unwrap_master_key(&new_record.auth, PASSWORD)
        .await
        .unwrap();
    assert_ne!(old_key.expose_secret(), new_key.expose_secret());
}

#[tokio::test]
async fn test_cancel_reset_returns_to_previous_state() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;
    session.request_reset().await.unwrap();
    session.cancel_reset().await.unwrap();
    assert_eq!(session.state().await, SessionState::Locked);
    assert!(store.raw(DEFAULT_RECORD_KEY).await.is_some());
    assert!(session.unlock(PASSWORD, false).await);

    // not offered once unlocked
    assert!(session.request_reset().await.is_err());
}

#[tokio::test]
async fn test_reset_delete_failure_is_reported() {
    let (store, _) = provisioned().await;
    let session = reopen(&store).await;
    session.request_reset().await.unwrap();

    store.set_fail_deletes(true);
    let err = session.confirm_reset().await.unwrap_err();
    assert!(matches!(err, VaultError::Storage(_)));
    assert_eq!(session.state().await, SessionState::ResettingConfirm);
    assert!(store.raw(DEFAULT_RECORD_KEY).await.is_some());

    store.set_fail_deletes(false);
    session.confirm_reset().await.unwrap();
    assert!(store.raw(DEFAULT_RECORD_KEY).await.is_none());
}

#[tokio::test]
async fn test_legacy_record_requires_reset() {
    let store = CountingStore::new();
    let legacy = br#"{"vaultData":{"iv":"AAAAAAAAAAAAAAAA","data":"AAAA"}}"#;
    store.put(DEFAULT_RECORD_KEY, legacy.to_vec()).await.unwrap();

    let session = reopen(&store).await;
    assert_eq!(session.state().await, SessionState::LegacyRequiresReset);
    assert!(!session.unlock(PASSWORD, false).await);
    assert!(matches!(
        session.try_unlock(PASSWORD, false).await,
        Err(VaultError::LegacyFormat)
    ));
    assert!(matches!(session.setup(PASSWORD).await, Err(VaultError::LegacyFormat)));

    session.request_reset().await.unwrap();
    session.confirm_reset().await.unwrap();
    assert_eq!(session.state().await, SessionState::Setup);
    session.setup(PASSWORD).await.unwrap();
}

#[tokio::test]
async fn test_record_in_legacy_location_is_migrated() {
    let source = CountingStore::new();
    let created = create_vault(PASSWORD, FAST_ITERATIONS).await.unwrap();
    source
        .put(DEFAULT_LEGACY_KEY, created.record.to_bytes().unwrap())
        .await
        .unwrap();

    let session = reopen(&source).await;
    assert_eq!(session.state().await, SessionState::Locked);
    assert!(source.raw(DEFAULT_LEGACY_KEY).await.is_none());
    assert_eq!(source.record(DEFAULT_RECORD_KEY).await, created.record);
    assert!(session.unlock(PASSWORD, false).await);
}

#[tokio::test]
async fn test_primary_record_wins_over_legacy_location() {
    let (store, _) = provisioned().await;
    store.put(DEFAULT_LEGACY_KEY, b"older".to_vec()).await.unwrap();
    let before = store.record(DEFAULT_RECORD_KEY).await;

    let session = reopen(&store).await;
    assert_eq!(session.state().await, SessionState::Locked);
    assert_eq!(store.record(DEFAULT_RECORD_KEY).await, before);
    assert_eq!(store.raw(DEFAULT_LEGACY_KEY).await.as_deref(), Some(&b"older"[..]));
}

#[tokio::test]
async fn test_custom_record_key_from_config() {
    let store = CountingStore::new();
    let config = Config::from_toml(
        r#"
        [storage]
        backend = "memory"
        record_key = "custom_vault"
        legacy_key = "custom_vault_old"

        [kdf]
        iterations = 1000
        "#,
    )
    .unwrap();

    let session = VaultSession::open(Arc::clone(&store), config.clone()).await.unwrap();
    session.setup(PASSWORD).await.unwrap();
    session.close().await.unwrap();

    assert!(store.raw("custom_vault").await.is_some());
    assert!(store.raw(DEFAULT_RECORD_KEY).await.is_none());
    let session = VaultSession::open(Arc::clone(&store), config).await.unwrap();
    assert!(session.unlock(PASSWORD, false).await);
}

#[tokio::test]
async fn test_unlock_persisted_record_directly() {
    let (store, phrase) = provisioned().await;
    let record = store.record(DEFAULT_RECORD_KEY).await;
    let unlocked = docu_vault::unlock(&record, &phrase, Credential::RecoveryPhrase)
        .await
        .unwrap();
    assert_eq!(unlocked.payload.recovery_phrase.as_deref(), Some(phrase.as_str()));
}
