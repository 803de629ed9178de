//! Cache store abstraction.
//!
//! The persistent store is partitioned into named generations ("cache
//! sets"): durable collections of request-identity → response-snapshot
//! entries. A set is append-only while it lives — entries are added or
//! overwritten under the same key, never evicted one by one. Eviction
//! happens only at generation granularity, when the
//! [`LifecycleController`](crate::worker::LifecycleController) deletes
//! every set absent from the current
//! [`GenerationRegistry`](crate::registry::GenerationRegistry).
//!
//! Durability is the backend's concern. Hosts with a real persistence
//! layer implement [`CacheStorage`]/[`CacheSet`] over it and inject the
//! implementation via
//! [`MuninnBuilder::storage()`](crate::MuninnBuilder::storage); the
//! in-crate [`MemoryStorage`] backend serves embedded hosts and tests.
//!
//! Backends must provide atomic per-key read/write but no cross-key
//! transactions. Two concurrent writers to the same identity may race;
//! last-write-wins is the accepted semantics.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::{RequestKey, ResponseSnapshot};

pub mod memory;

pub use memory::MemoryStorage;

/// The partitioned persistent store: named cache sets.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a cache set by name, creating it on first open.
    ///
    /// The returned handle stays valid even if the set is later deleted
    /// from the storage — an in-flight reader finishes against its own
    /// handle. Delete races during generation cleanup rely on this.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheSet>>;

    /// Names of every cache set currently in the store.
    async fn names(&self) -> Result<Vec<String>>;

    /// Delete a whole cache set. Returns `false` when no such set exists.
    async fn delete(&self, name: &str) -> Result<bool>;
}

/// One named generation of cached responses.
#[async_trait]
pub trait CacheSet: Send + Sync {
    /// The set's name, version suffix included.
    fn name(&self) -> &str;

    /// Look up a snapshot by request identity. `None` on miss.
    async fn lookup(&self, key: &RequestKey) -> Option<ResponseSnapshot>;

    /// Insert or overwrite the snapshot stored under `key`.
    async fn store(&self, key: RequestKey, snapshot: ResponseSnapshot) -> Result<()>;

    /// Number of entries currently in the set.
    async fn entry_count(&self) -> u64;
}
