//! In-memory KV store - used when no remote store is configured, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use haiku_core::ports::{KvError, KvStore};

/// In-memory KV store using an ordered map behind an async RwLock.
///
/// Keys list in lexicographic order, matching the remote store.
/// Note: Data is lost on process restart.
pub struct InMemoryKvStore {
    store: RwLock<BTreeMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
        }
    }

    /// Whether no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let store = self.store.read().await;
        Ok(store
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut store = self.store.write().await;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let kv = InMemoryKvStore::new();
        kv.put("key1", "value1").await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let kv = InMemoryKvStore::new();
        assert_eq!(kv.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let kv = InMemoryKvStore::new();
        kv.put("key1", "value1").await.unwrap();
        kv.delete("key1").await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), None);
        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_keys_filters_by_prefix() {
        let kv = InMemoryKvStore::new();
        kv.put("haiku_b", "2").await.unwrap();
        kv.put("other", "x").await.unwrap();
        kv.put("haiku_a", "1").await.unwrap();
        kv.put("haikus", "y").await.unwrap();

        let keys = kv.list_keys("haiku_").await.unwrap();
        assert_eq!(keys, vec!["haiku_a".to_string(), "haiku_b".to_string()]);
    }
}
