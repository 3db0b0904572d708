//! Pluggable backing stores for computed analyses.

use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::RwLock;

use super::fingerprint::Fingerprint;
use crate::chart::CacheEntry;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get(&self, key: &Fingerprint) -> Option<CacheEntry>;
    async fn put(&self, key: Fingerprint, entry: CacheEntry);
    async fn remove(&self, key: &Fingerprint);
    async fn clear(&self);
}

/// Holds only the most recent entry. Every `put` overwrites the slot.
#[derive(Default)]
pub struct SingleSlotStore {
    slot: RwLock<Option<(Fingerprint, CacheEntry)>>,
}

impl SingleSlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for SingleSlotStore {
    async fn get(&self, key: &Fingerprint) -> Option<CacheEntry> {
        self.slot
            .read()
            .as_ref()
            .filter(|(stored, _)| stored == key)
            .map(|(_, entry)| entry.clone())
    }

    async fn put(&self, key: Fingerprint, entry: CacheEntry) {
        *self.slot.write() = Some((key, entry));
    }

    async fn remove(&self, key: &Fingerprint) {
        let mut slot = self.slot.write();
        if slot.as_ref().is_some_and(|(stored, _)| stored == key) {
            *slot = None;
        }
    }

    async fn clear(&self) {
        *self.slot.write() = None;
    }
}

/// Fingerprint-keyed store for multi-user deployments. Entries never expire;
/// only capacity pressure evicts them.
pub struct MokaAnalysisStore {
    cache: Cache<Fingerprint, CacheEntry>,
}

impl MokaAnalysisStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

#[async_trait]
impl AnalysisStore for MokaAnalysisStore {
    async fn get(&self, key: &Fingerprint) -> Option<CacheEntry> {
        self.cache.get(key).await
    }

    async fn put(&self, key: Fingerprint, entry: CacheEntry) {
        self.cache.insert(key, entry).await;
    }

    async fn remove(&self, key: &Fingerprint) {
        self.cache.invalidate(key).await;
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
    }
}
