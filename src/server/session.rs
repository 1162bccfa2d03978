//! Client identity extraction for nonce binding.
//!
//! Notices are advisory, so there is no authentication layer here: the
//! session token only binds dismissal nonces to the client that was shown
//! the notice. Anonymous clients share the empty identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::convert::Infallible;

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

/// The session token of the requesting client, or the empty string when
/// the request carries none.
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub String);

async fn extract_session_token_from_cookies<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Option<String> {
    CookieJar::from_request_parts(parts, state)
        .await
        .expect("Could not read cookies into CookieJar.")
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

fn extract_session_token_from_headers(parts: &mut Parts) -> Option<String> {
    parts
        .headers
        .get(HEADER_SESSION_TOKEN_KEY)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_session_token_from_cookies(parts, state)
            .await
            .or_else(|| extract_session_token_from_headers(parts))
            .unwrap_or_default();
        Ok(ClientIdentity(token))
    }
}
