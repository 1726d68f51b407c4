use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{StorageError, TokenStorage};

/// In-memory storage implementation.
///
/// This implementation stores all data in memory and is primarily
/// intended for testing and ephemeral sessions. Data is lost when the
/// process exits. Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        drop(self.data.write().insert(key.to_owned(), value.to_owned()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        drop(self.data.write().remove(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let storage = MemoryTokenStorage::new();

        storage.set("k", "v").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some("v".to_owned()));

        storage.set("k", "v2").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some("v2".to_owned()));

        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);

        // Removing an absent key is fine.
        storage.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn clones_share_state() {
        let storage = MemoryTokenStorage::new();
        let other = storage.clone();

        storage.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some("v".to_owned()));
    }
}
