//! The key-value accessor port and its adapters.

use async_trait::async_trait;
use serde_json::Value;

mod memory;
mod postgres;

pub use memory::MemoryKvStore;
pub use postgres::PgKvStore;

/// Errors surfaced by a key-value adapter.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The PostgreSQL backend failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value could not be encoded, or a stored value could not be decoded
    /// into the expected record shape.
    #[error("Value under '{key}' could not be (de)serialized: {message}")]
    Serialization { key: String, message: String },
}

/// A flat, string-keyed store of JSON values.
///
/// Adapters guarantee per-key atomic `get`/`set`/`delete` and nothing more:
/// no multi-key transactions, no conditional writes. `get_by_prefix` returns
/// values in the adapter's storage order.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;

    /// All values whose key starts with `prefix`.
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, KvError>;
}
