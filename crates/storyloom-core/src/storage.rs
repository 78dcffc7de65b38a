//! Key-value store abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// A simple durable string store.
///
/// Implementations report capacity or I/O rejections as
/// `DomainError::Storage`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
