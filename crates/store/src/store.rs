use async_trait::async_trait;

use crate::Result;

/// Persistent byte-keyed store behind the cache bridge.
///
/// Implementations must tolerate concurrent callers; `put` on an existing key
/// replaces the value (last write wins) and readers must never observe a
/// partially written value.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()>;
}
