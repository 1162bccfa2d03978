//! Notice storage trait

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

use super::models::{NoticeBucket, Scope};

/// Keyed object store for notice buckets.
///
/// Implementations own one bucket per scope and treat the bucket as an
/// opaque value: all merging, expiry and key lookups happen above this
/// trait. A write replaces the whole bucket (last writer wins, no
/// transactional guarantee across a read-modify-write sequence).
pub trait NoticeStore: Send + Sync {
    /// Load the bucket for a scope. `None` means no bucket has ever been
    /// written; a stored value that fails to decode must surface as an
    /// empty bucket, not as an error.
    fn load_bucket(&self, scope: &Scope) -> Result<Option<NoticeBucket>>;

    /// Persist the whole bucket for a scope, replacing any previous value.
    fn save_bucket(&self, scope: &Scope, bucket: &NoticeBucket) -> Result<()>;

    /// Remove the bucket for a scope entirely.
    fn delete_bucket(&self, scope: &Scope) -> Result<()>;
}

/// In-memory store for tests and embedders that don't need persistence.
#[derive(Default)]
pub struct InMemoryNoticeStore {
    buckets: Mutex<HashMap<Scope, NoticeBucket>>,
}

impl InMemoryNoticeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoticeStore for InMemoryNoticeStore {
    fn load_bucket(&self, scope: &Scope) -> Result<Option<NoticeBucket>> {
        Ok(self.buckets.lock().unwrap().get(scope).cloned())
    }

    fn save_bucket(&self, scope: &Scope, bucket: &NoticeBucket) -> Result<()> {
        self.buckets.lock().unwrap().insert(*scope, bucket.clone());
        Ok(())
    }

    fn delete_bucket(&self, scope: &Scope) -> Result<()> {
        self.buckets.lock().unwrap().remove(scope);
        Ok(())
    }
}
