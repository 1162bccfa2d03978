//! Display walk: merge the global and object buckets, evict expired notices.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::models::{Notice, Scope};
use super::registry::NoticeRegistry;
use super::store::NoticeStore;

/// A notice paired with the scope whose bucket it was loaded from. Eviction
/// must target this scope, never the scope the walk happened to look at
/// last.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedNotice {
    pub scope: Scope,
    pub notice: Notice,
}

/// A notice prepared for rendering: the four container data attributes plus
/// the message body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNotice {
    pub object_type: String,
    pub object_id: i64,
    pub key: String,
    pub css_classes: String,
    pub message: String,
}

impl From<&PostedNotice> for RenderedNotice {
    fn from(posted: &PostedNotice) -> Self {
        let mut css_classes = format!(
            "notice admin-notice {}",
            posted.notice.severity.css_class()
        );
        if posted.notice.dismissable {
            css_classes.push_str(" is-dismissible");
        }

        RenderedNotice {
            object_type: posted.scope.object_type_attr().to_string(),
            object_id: posted.scope.object_id_attr(),
            key: posted.notice.key.clone(),
            css_classes,
            message: posted.notice.message.clone(),
        }
    }
}

/// Collect the active notices for a screen: the global bucket merged with
/// the current object's bucket (object entries win key collisions), with
/// expired notices removed from their owning scope's bucket as a side
/// effect of the walk and excluded from the result.
///
/// Eviction is best-effort; a store failure during eviction is logged and
/// the expired notice is still excluded from this pass.
pub fn collect_active(
    store: &Arc<dyn NoticeStore>,
    object_scope: Option<Scope>,
    now: i64,
) -> Result<Vec<PostedNotice>> {
    let mut merged: HashMap<String, PostedNotice> = HashMap::new();

    let global = NoticeRegistry::new(store.clone(), Scope::Global);
    for (key, notice) in global.get_all()? {
        merged.insert(
            key,
            PostedNotice {
                scope: Scope::Global,
                notice,
            },
        );
    }

    if let Some(scope) = object_scope {
        let object = NoticeRegistry::new(store.clone(), scope);
        for (key, notice) in object.get_all()? {
            merged.insert(key, PostedNotice { scope, notice });
        }
    }

    let mut active = Vec::new();
    for posted in merged.into_values() {
        if posted.notice.is_expired(now) {
            let owner = NoticeRegistry::new(store.clone(), posted.scope);
            if let Err(err) = owner.delete(&posted.notice.key) {
                warn!(
                    "Failed to evict expired notice {} from {:?}: {}",
                    posted.notice.key, posted.scope, err
                );
            }
            continue;
        }
        active.push(posted);
    }

    // Bucket order is undefined, keep rendering deterministic.
    active.sort_by(|a, b| a.notice.key.cmp(&b.notice.key));
    Ok(active)
}
