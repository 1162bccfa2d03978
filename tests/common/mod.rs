//! Shared end-to-end test infrastructure
//!
//! Provides an isolated server per test plus an HTTP client wrapper.

pub mod client;
pub mod server;

pub use client::TestClient;
pub use server::TestServer;
