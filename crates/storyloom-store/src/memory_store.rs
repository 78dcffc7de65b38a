//! In-memory `KeyValueStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use storyloom_core::storage::KeyValueStore;
use tokio::sync::RwLock;

/// A process-local store. When a capacity is configured, a write that would
/// push the total stored bytes (keys plus values) over it is rejected, the
/// way browser storage rejects writes past its quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    capacity_bytes: Option<usize>,
}

impl MemoryStore {
    /// Creates an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes beyond `capacity_bytes`.
    #[must_use]
    pub fn with_capacity_bytes(capacity_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity_bytes: Some(capacity_bytes),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        if let Some(capacity) = self.capacity_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > capacity {
                return Err(DomainError::Storage(format!(
                    "store capacity exceeded: {needed} of {capacity} bytes"
                )));
            }
        }
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
