//! Assignment Store Module
//!
//! Storage abstraction for persisted assignments. The shape mirrors a
//! browser cookie/localStorage record: opaque bytes under a string key
//! with a time-to-live. Backends only need `get`/`set`/`delete`/`exists`;
//! the client layer owns serialization and degraded-mode handling.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::Duration;
//! use reparto::store::{AssignmentStore, MemoryStore};
//!
//! # async fn example() -> reparto::Result<()> {
//! let store = MemoryStore::new();
//!
//! store.set("ab::wave2::v1", b"b".to_vec(), Duration::days(30)).await?;
//! let value = store.get("ab::wave2::v1").await?;
//! assert_eq!(value, Some(b"b".to_vec()));
//!
//! store.delete("ab::wave2::v1").await?;
//! assert!(!store.exists("ab::wave2::v1").await?);
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::MemoryStore;

use crate::Result;
use chrono::Duration;
use std::future::Future;

/// Assignment store trait.
///
/// Implementations are the persistence seam: in-memory for tests and
/// single-process use, or any external keyed store with expiry semantics.
/// An expired record must behave exactly like a missing one.
pub trait AssignmentStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Set a value for a key with a time-to-live.
    ///
    /// Overwrites any existing value. Concurrent writers race with
    /// last-write-wins semantics.
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete a key.
    ///
    /// No-op if the key doesn't exist.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if a key exists (and has not expired).
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;
}
