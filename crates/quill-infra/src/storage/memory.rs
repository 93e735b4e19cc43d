//! In-memory key-value store - the default backing store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::StorageError;
use quill_core::ports::KeyValueStore;

/// In-memory store using a HashMap with async RwLock.
///
/// An optional quota caps the total bytes held (keys plus values), the way
/// browser local storage does.
/// Note: Data is lost on process restart.
pub struct InMemoryKvStore {
    store: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes(store: &HashMap<String, String>, excluding: &str) -> usize {
        store
            .iter()
            .filter(|(k, _)| k.as_str() != excluding)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;

        if let Some(limit) = self.quota_bytes {
            let needed = Self::used_bytes(&store, key) + key.len() + value.len();
            if needed > limit {
                tracing::warn!(key = %key, needed, limit, "Storage quota exceeded");
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}
