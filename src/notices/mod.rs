//! Admin notices: scoped, expiring, dismissible advisory messages.

mod display;
mod models;
mod registry;
mod schema;
mod sqlite_notice_store;
mod store;

pub use display::{collect_active, PostedNotice, RenderedNotice};
pub use models::{
    Notice, NoticeBucket, ObjectType, Scope, Severity, NOTICES_META_KEY,
};
pub use registry::{NoticeOptions, NoticeRegistry};
pub use sqlite_notice_store::SqliteNoticeStore;
pub use store::{InMemoryNoticeStore, NoticeStore};
