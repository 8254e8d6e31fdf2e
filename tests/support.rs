// tests/support.rs
//! Test utilities: fast-KDF config and instrumented stores

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use docu_vault::config::{Backend, Config};
use docu_vault::envelope::{self, Credential, StoredRecord, VaultRecord};
use docu_vault::{BlobStore, MemoryStore, Result, VaultError, VaultPayload};

/// Lowest count the config accepts; keeps PBKDF2 out of the test runtime.
pub const FAST_ITERATIONS: u32 = 1_000;

#[allow(dead_code)]
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.storage.backend = Backend::Memory;
    config.kdf.iterations = FAST_ITERATIONS;
    config
}

/// In-memory store that counts writes and can be told to start failing them.
#[derive(Default)]
#[allow(dead_code)]
pub struct CountingStore {
    inner: MemoryStore,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.get(key).await.unwrap()
    }

    /// The persisted record, which must be in the current format.
    pub async fn record(&self, key: &str) -> VaultRecord {
        let bytes = self.raw(key).await.expect("no record persisted");
        match StoredRecord::classify(&bytes) {
            StoredRecord::Current(record) => record,
            StoredRecord::Legacy(legacy) => panic!("unexpected legacy record: {:?}", legacy.reason()),
        }
    }

    /// Decrypt what is persisted right now with `password`.
    pub async fn persisted_payload(&self, key: &str, password: &str) -> VaultPayload {
        let record = self.record(key).await;
        envelope::unlock(&record, password, Credential::Password)
            .await
            .expect("persisted record does not unlock")
            .payload
    }
}

#[async_trait]
impl BlobStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(VaultError::Storage("disk full".into()));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(VaultError::Storage("read-only".into()));
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }
}

/// Every call fails.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl BlobStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(VaultError::Storage("unreachable".into()))
    }

    async fn put(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
        Err(VaultError::Storage("unreachable".into()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(VaultError::Storage("unreachable".into()))
    }
}

/// `^[A-Z2-9]{4}-[A-Z2-9]{4}-[A-Z2-9]{4}-[A-Z2-9]{4}$`
#[allow(dead_code)]
pub fn matches_phrase_pattern(phrase: &str) -> bool {
    let groups: Vec<&str> = phrase.split('-').collect();
    groups.len() == 4
        && groups.iter().all(|g| {
            g.len() == 4
                && g.chars()
                    .all(|c| c.is_ascii_uppercase() || ('2'..='9').contains(&c))
        })
}
