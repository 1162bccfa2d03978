pub mod config;
mod http_layers;
pub mod nonce;
pub mod screen;
pub mod server;
pub(crate) mod session;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use nonce::{NonceProvider, DISMISS_ACTION};
#[allow(unused_imports)] // Used by main.rs
pub use server::run_server;
#[allow(unused_imports)] // Used by the e2e test harness
pub use server::serve_on;
