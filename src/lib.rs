//! Admin Notices Server Library
//!
//! This library exposes the internal modules for testing and embedding: a
//! host application can use [`notices::NoticeRegistry`] directly against
//! its own store and wire the server routes into its own lifecycle.

pub mod config;
pub mod notices;
pub mod server;

// Re-export commonly used types for convenience
pub use notices::{
    NoticeOptions, NoticeRegistry, NoticeStore, ObjectType, Scope, Severity, SqliteNoticeStore,
};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
