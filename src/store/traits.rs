//! Backend-agnostic key-value persistence trait.

use async_trait::async_trait;

use crate::error::StoreError;

/// Async key-value store holding JSON values under string keys.
///
/// Writes are last-write-wins; there is no expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// Stored text that is not valid JSON comes back as `Value::Null`.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Remove the value under `key`. Returns whether anything was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
