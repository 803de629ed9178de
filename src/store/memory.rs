//! In-memory cache storage backend.
//!
//! [`MemoryStorage`] keeps each cache set as an unbounded
//! `moka::future::Cache` — unbounded because entries within a generation
//! are never evicted individually; space is reclaimed only by deleting
//! whole sets during activation. moka gives the atomic per-key
//! read/write the store contract requires.
//!
//! Deleting a set removes it from the name map; any in-flight reader
//! still holding the set's `Arc` keeps reading until it drops the
//! handle. That is exactly the delete-race tolerance generation cleanup
//! depends on.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use tokio::sync::RwLock;

use crate::Result;
use crate::store::{CacheSet, CacheStorage};
use crate::types::{RequestKey, ResponseSnapshot};

/// In-memory [`CacheStorage`] backend.
#[derive(Default)]
pub struct MemoryStorage {
    sets: RwLock<HashMap<String, Arc<MemorySet>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheSet>> {
        if let Some(set) = self.sets.read().await.get(name) {
            return Ok(set.clone());
        }
        let mut sets = self.sets.write().await;
        let set = sets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemorySet::new(name)))
            .clone();
        Ok(set)
    }

    async fn names(&self) -> Result<Vec<String>> {
        Ok(self.sets.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.sets.write().await.remove(name).is_some())
    }
}

/// One in-memory cache set.
pub struct MemorySet {
    name: String,
    entries: Cache<RequestKey, ResponseSnapshot>,
}

impl MemorySet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Cache::builder().build(),
        }
    }
}

#[async_trait]
impl CacheSet for MemorySet {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, key: &RequestKey) -> Option<ResponseSnapshot> {
        self.entries.get(key).await
    }

    async fn store(&self, key: RequestKey, snapshot: ResponseSnapshot) -> Result<()> {
        self.entries.insert(key, snapshot).await;
        Ok(())
    }

    async fn entry_count(&self) -> u64 {
        // moka's count is eventually consistent; flush pending tasks so
        // callers see writes that already completed.
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
