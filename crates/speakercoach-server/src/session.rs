//! Session cookie identity.
//!
//! The caller's identity is the value of the `speakercoach_session` cookie,
//! honored only while it names a live server-side session. Reads without a
//! live session see an empty one; a write without one gets a freshly minted
//! identity. Every successful write re-sends the cookie so its `Max-Age`
//! tracks the server-side expiry.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use speakercoach_core::{AppCore, HistoryError};
use std::convert::Infallible;
use std::time::Duration;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "speakercoach_session";

const MAX_IDENTITY_LEN: usize = 64;

/// Identity presented by the request's session cookie, not yet checked
/// against the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity(Option<String>);

impl SessionIdentity {
    pub fn presented(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Identity a write should land under: the presented one while its
    /// session is live, otherwise a freshly minted one.
    pub fn live_or_mint(&self, core: &AppCore) -> Result<String, HistoryError> {
        match core.live_session(self.presented())? {
            Some(identity) => Ok(identity),
            None => {
                if let Some(presented) = self.presented() {
                    tracing::debug!(presented, "Ignoring cookie without a live session");
                }
                Ok(mint_identity())
            }
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(identity_from_headers(&parts.headers)))
    }
}

pub fn mint_identity() -> String {
    let identity = Uuid::new_v4().to_string();
    tracing::debug!(identity = %identity, "Minted new session");
    identity
}

/// `Set-Cookie` value binding `identity` for `max_age`.
pub fn session_cookie(identity: &str, max_age: Duration) -> Option<HeaderValue> {
    let cookie = format!(
        "{SESSION_COOKIE}={identity}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    HeaderValue::from_str(&cookie).ok()
}

pub fn with_session_cookie(response: impl IntoResponse, cookie: Option<HeaderValue>) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

fn identity_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| is_valid_identity(value))
        .map(str::to_string)
}

fn is_valid_identity(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_IDENTITY_LEN
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
