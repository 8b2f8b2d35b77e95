//! Key-value store port - abstraction over remote KV backends.

use async_trait::async_trait;

/// Raw key-value store. Values are opaque strings.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// List every key starting with `prefix`, in store order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KvError>;

    /// Get the raw value for a key. `Ok(None)` means the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Overwrite the value stored under a key.
    async fn put(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Remove a key.
    async fn delete(&self, key: &str) -> Result<(), KvError>;
}

/// KV store errors.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("KV request failed: {0}")]
    Request(String),

    #[error("KV store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("KV store reported failure: {0}")]
    Api(String),
}
