//! Keyed entity storage.
//!
//! The services only ever talk to [`EntityStore`]; the in-memory backing is
//! a stand-in for a managed key-value database. Single-key operations are
//! atomic; multi-step sequences (capacity check then insert, cascading
//! delete) are serialized by the services' per-event locks, not here.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("stored record is not valid JSON for its schema: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Atomic per-key operations over JSON records.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn put(&self, key: &str, record: Value) -> Result<(), StoreError>;

    /// Removes the record; returns whether a record existed under `key`.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All records whose key starts with `prefix`, in key order.
    async fn scan(&self, prefix: &str) -> Result<Vec<Value>, StoreError>;
}
