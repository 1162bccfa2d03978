use axum::extract::FromRef;

use crate::notices::NoticeStore;
use std::sync::Arc;
use std::time::Instant;

use super::nonce::NonceProvider;
use super::ServerConfig;

pub type GuardedNoticeStore = Arc<dyn NoticeStore>;
pub type GuardedNonceProvider = Arc<NonceProvider>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub notice_store: GuardedNoticeStore,
    pub nonce_provider: GuardedNonceProvider,
}

impl FromRef<ServerState> for GuardedNoticeStore {
    fn from_ref(input: &ServerState) -> Self {
        input.notice_store.clone()
    }
}

impl FromRef<ServerState> for GuardedNonceProvider {
    fn from_ref(input: &ServerState) -> Self {
        input.nonce_provider.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
