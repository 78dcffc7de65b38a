//! Test stores — failing `KeyValueStore` implementations.

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use storyloom_core::storage::KeyValueStore;

/// A store that reads as empty and rejects every write, like a storage
/// medium that is out of space.
#[derive(Debug)]
pub struct RejectingStore;

#[async_trait]
impl KeyValueStore for RejectingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::Storage("quota exceeded".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A store whose every operation fails.
#[derive(Debug)]
pub struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Storage("store unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::Storage("store unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::Storage("store unavailable".into()))
    }
}
