//! Injected TTL cache
//!
//! Resolution itself keeps no state. Callers that want to reuse snapshots
//! (or other per-user context) across requests inject a [`TtlCache`] so the
//! cache can be swapped out or cleared in tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key-value cache with per-entry time to live.
#[async_trait]
pub trait TtlCache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Get a live entry.
    async fn get(&self, key: &str) -> Option<V>;

    /// Store an entry for `ttl`. A non-positive TTL stores nothing useful:
    /// the entry is already expired.
    async fn set(&self, key: &str, value: V, ttl: Duration);

    /// Remove an entry. Returns `true` if a live entry was removed.
    async fn invalidate(&self, key: &str) -> bool;

    /// Remove every entry.
    async fn invalidate_all(&self);
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// In-memory TTL cache.
///
/// Expired entries are dropped lazily on access or by
/// [`purge_expired`](Self::purge_expired).
pub struct MemoryTtlCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
}

impl<V> std::fmt::Debug for MemoryTtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTtlCache").finish_non_exhaustive()
    }
}

impl<V> Clone for MemoryTtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for MemoryTtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryTtlCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entries, live or not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

#[async_trait]
impl<V> TtlCache<V> for MemoryTtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    async fn invalidate(&self, key: &str) -> bool {
        let now = Utc::now();
        self.entries
            .write()
            .await
            .remove(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    async fn invalidate_all(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache: MemoryTtlCache<u32> = MemoryTtlCache::new();
        cache.set("user-1", 42u32, Duration::minutes(5)).await;

        assert_eq!(cache.get("user-1").await, Some(42));
        assert_eq!(cache.get("user-2").await, None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_dropped_on_get() {
        let cache: MemoryTtlCache<String> = MemoryTtlCache::new();
        cache.set("user-1", "stale".to_string(), Duration::zero()).await;

        assert_eq!(cache.get("user-1").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache: MemoryTtlCache<u8> = MemoryTtlCache::new();
        cache.set("user-1", 1u8, Duration::minutes(5)).await;

        assert!(cache.invalidate("user-1").await);
        assert!(!cache.invalidate("user-1").await);
        assert_eq!(cache.get("user-1").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_all_and_purge() {
        let cache: MemoryTtlCache<u8> = MemoryTtlCache::new();
        cache.set("live", 1u8, Duration::minutes(5)).await;
        cache.set("dead", 2u8, Duration::seconds(-1)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);

        cache.invalidate_all().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache: MemoryTtlCache<i64> = MemoryTtlCache::new();
        let handle = cache.clone();
        handle.set("k", 7i64, Duration::minutes(1)).await;
        assert_eq!(cache.get("k").await, Some(7));
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let cache: Arc<dyn TtlCache<u32>> = Arc::new(MemoryTtlCache::new());
        cache.set("k", 3, Duration::minutes(1)).await;
        assert_eq!(cache.get("k").await, Some(3));
    }
}
