//! In-memory assignment store backed by `DashMap`.
//!
//! Default backend - records are lost on process restart, which matches
//! the degraded browser mode (cookies disabled) rather than breaking it.
//! Expiry is lazy: an expired record is dropped on the read that finds it.

use super::AssignmentStore;
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

#[derive(Debug, Clone)]
struct Record {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

impl Record {
    fn expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// In-memory assignment store using a lock-free concurrent hashmap.
///
/// Thread-safe; concurrent writers to the same key race with
/// last-write-wins semantics, which is the accepted behavior for
/// simultaneous first visits.
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use reparto::store::{AssignmentStore, MemoryStore};
///
/// # async fn example() -> reparto::Result<()> {
/// let store = MemoryStore::new();
/// store.set("hello", b"world".to_vec(), Duration::days(30)).await?;
/// assert_eq!(store.get("hello").await?, Some(b"world".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    records: DashMap<String, Record, FxBuildHasher>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Get the number of records, including not-yet-collected expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clear all records.
    pub fn clear(&self) {
        self.records.clear();
    }

    /// Drop every expired record now instead of waiting for lazy expiry.
    pub fn purge_expired(&self) {
        self.records.retain(|_, record| !record.expired());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(record) = self.records.get(key) {
            if !record.expired() {
                return Ok(Some(record.value.clone()));
            }
        }
        // Lazy expiry: collect on read.
        self.records.remove_if(key, |_, record| record.expired());
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.records.insert(
            key.to_string(),
            Record {
                value,
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemoryStore::new();
        store
            .set("live", b"1".to_vec(), Duration::days(1))
            .await
            .unwrap();
        store
            .set("dead", b"2".to_vec(), Duration::milliseconds(-1))
            .await
            .unwrap();
        assert_eq!(store.len(), 2);

        store.purge_expired();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("live").await.unwrap(), Some(b"1".to_vec()));
    }

    #[tokio::test]
    async fn test_lazy_expiry_removes_record() {
        let store = MemoryStore::new();
        store
            .set("dead", b"2".to_vec(), Duration::milliseconds(-1))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        assert_eq!(store.get("dead").await.unwrap(), None);
        assert_eq!(store.len(), 0);
    }
}
