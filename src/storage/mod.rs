// src/storage/mod.rs
//! Persistence adapter: an opaque asynchronous key/value blob store
//!
//! The vault core only ever calls `get`/`put`/`delete` on a single fixed key
//! (plus the legacy location). Any failure is [`VaultError::Storage`]; there is
//! no retry here, that is the adapter's or caller's business.
//!
//! [`VaultError::Storage`]: crate::error::VaultError::Storage

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Deleting a key that isn't there is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }
}
