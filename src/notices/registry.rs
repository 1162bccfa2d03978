//! Notice registry: CRUD over one scope's bucket.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::models::{Notice, NoticeBucket, Scope, Severity};
use super::store::NoticeStore;

/// Optional fields for [`NoticeRegistry::add`]. Defaults match the original
/// board API: info severity, dismissable, never expires, no log echo.
#[derive(Debug, Clone)]
pub struct NoticeOptions {
    pub severity: Severity,
    pub dismissable: bool,
    /// Seconds until expiry; 0 (or negative, normalized to 0) means never.
    pub ttl_seconds: i64,
    /// Also echo the message to the diagnostic log. Pure side channel, has
    /// no effect on stored state.
    pub log_message: bool,
}

impl Default for NoticeOptions {
    fn default() -> Self {
        NoticeOptions {
            severity: Severity::Info,
            dismissable: true,
            ttl_seconds: 0,
            log_message: false,
        }
    }
}

/// CRUD operations over the notice bucket of a single scope.
///
/// The registry does not own storage; it mediates access to the injected
/// [`NoticeStore`]. Each operation is a full load-modify-save of the
/// scope's bucket.
pub struct NoticeRegistry {
    store: Arc<dyn NoticeStore>,
    scope: Scope,
}

impl NoticeRegistry {
    pub fn new(store: Arc<dyn NoticeStore>, scope: Scope) -> Self {
        Self { store, scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Upsert a notice under `key`. An existing notice with the same key is
    /// replaced wholesale, including a fresh creation timestamp. Empty keys
    /// and messages are accepted as-is.
    pub fn add(&self, key: &str, message: &str, options: NoticeOptions) -> Result<()> {
        let notice = Notice {
            key: key.to_string(),
            message: message.to_string(),
            severity: options.severity,
            dismissable: options.dismissable,
            created_at: Utc::now().timestamp(),
            ttl_seconds: options.ttl_seconds.max(0),
        };

        let mut bucket = self.get_all()?;
        bucket.insert(notice.key.clone(), notice);
        let result = self.store.save_bucket(&self.scope, &bucket);

        if options.log_message {
            info!("Notice [{}] {}: {}", options.severity.as_str(), key, message);
        }

        result
    }

    /// Remove the notice under `key`. Removing an absent key is a no-op
    /// that still reports success.
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut bucket = self.get_all()?;
        bucket.remove(key);
        self.store.save_bucket(&self.scope, &bucket)
    }

    /// The bucket for this scope; absent or corrupt stored values yield an
    /// empty bucket.
    pub fn get_all(&self) -> Result<NoticeBucket> {
        Ok(self.store.load_bucket(&self.scope)?.unwrap_or_default())
    }

    /// Drop the whole bucket for this scope in one store operation.
    pub fn clear(&self) -> Result<()> {
        self.store.delete_bucket(&self.scope)
    }
}
