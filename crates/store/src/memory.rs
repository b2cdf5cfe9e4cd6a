use {async_trait::async_trait, dashmap::DashMap};

use crate::{Result, store::CacheStore};

/// Process-local store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::sync::Arc};

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(b"nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        store.put(b"k", b"one".to_vec()).await.unwrap();
        store.put(b"k", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get(b"k").await.unwrap().unwrap(), b"two");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_writers() {
        let store = Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0u8..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.put(&[i], vec![i]).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(store.len(), 16);
        assert_eq!(store.get(&[3]).await.unwrap().unwrap(), vec![3]);
    }
}
