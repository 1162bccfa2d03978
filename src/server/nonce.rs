//! Short-lived action tokens for the dismissal endpoint.
//!
//! Reproduces the host framework's nonce semantics: a token is a truncated
//! digest over (secret, time tick, action, session token), where a tick is
//! half the configured lifetime. Verification accepts the current and the
//! previous tick, so a token stays valid for between half and the full
//! lifetime.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Action name bound into dismissal nonces.
pub const DISMISS_ACTION: &str = "dismiss-notice";

const NONCE_LENGTH: usize = 16;

pub struct NonceProvider {
    secret: Vec<u8>,
    lifetime_secs: i64,
}

impl NonceProvider {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            // A tick is lifetime/2; keep it at least one second.
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    /// Random secret for servers that don't configure one. Nonces do not
    /// survive a restart in that case, which is acceptable for dismissal
    /// tokens.
    pub fn generate_secret() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }

    fn tick(&self, now: i64) -> i64 {
        now / (self.lifetime_secs / 2)
    }

    fn token_for(&self, tick: i64, action: &str, session: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(tick.to_le_bytes());
        hasher.update(action.as_bytes());
        hasher.update(session.as_bytes());
        let digest = hasher.finalize();

        let mut token = URL_SAFE_NO_PAD.encode(digest);
        token.truncate(NONCE_LENGTH);
        token
    }

    pub fn create(&self, action: &str, session: &str) -> String {
        self.create_at(action, session, Utc::now().timestamp())
    }

    pub fn create_at(&self, action: &str, session: &str, now: i64) -> String {
        self.token_for(self.tick(now), action, session)
    }

    pub fn verify(&self, token: &str, action: &str, session: &str) -> bool {
        self.verify_at(token, action, session, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, action: &str, session: &str, now: i64) -> bool {
        let tick = self.tick(now);
        token == self.token_for(tick, action, session)
            || token == self.token_for(tick - 1, action, session)
    }
}
