//! Result reuse keyed by the exact input that produced it.

pub mod fingerprint;
pub mod store;

use std::sync::Arc;

pub use fingerprint::{fingerprint_equals, Fingerprint};
pub use store::{AnalysisStore, MokaAnalysisStore, SingleSlotStore};

use crate::chart::{AnalysisResult, CacheEntry, Subject};

/// Return the cached result only when its subject matches `current` exactly.
pub fn lookup<'a>(current: &Subject, cached: Option<&'a CacheEntry>) -> Option<&'a AnalysisResult> {
    cached
        .filter(|entry| fingerprint_equals(current, &entry.subject))
        .map(|entry| &entry.result)
}

#[derive(Clone)]
pub struct AnalysisCache {
    store: Arc<dyn AnalysisStore>,
}

impl AnalysisCache {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self { store }
    }

    pub fn single_slot() -> Self {
        Self::new(Arc::new(SingleSlotStore::new()))
    }

    pub fn keyed(max_capacity: u64) -> Self {
        Self::new(Arc::new(MokaAnalysisStore::new(max_capacity)))
    }

    pub async fn lookup(&self, subject: &Subject) -> Option<AnalysisResult> {
        let key = Fingerprint::of(subject);
        let entry = self.store.get(&key).await;
        // a digest collision must never serve another subject's analysis
        lookup(subject, entry.as_ref()).cloned()
    }

    pub async fn store(&self, subject: Subject, result: AnalysisResult) {
        let key = Fingerprint::of(&subject);
        log::debug!("Caching analysis under fingerprint {}", key.as_str());
        self.store.put(key, CacheEntry { subject, result }).await;
    }

    pub async fn forget(&self, subject: &Subject) {
        self.store.remove(&Fingerprint::of(subject)).await;
    }

    pub async fn clear(&self) {
        self.store.clear().await;
    }
}
