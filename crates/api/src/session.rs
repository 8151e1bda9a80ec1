//! Signed cookie session with one-shot flash messages.
//!
//! The whole session lives client-side in a single signed cookie: the
//! authenticated user id (if any) and the flash messages queued for the next
//! rendered page. Every mutation re-reads the cookie jar before writing, so
//! several [`Session`] handles extracted in the same request never clobber
//! each other's changes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies, Key};
use wanderlust_core::types::DbId;

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "wanderlust_session";

/// Derive the 64-byte cookie signing key from an arbitrary-length secret.
pub fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flash: Vec<Flash>,
}

impl SessionData {
    fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.flash.is_empty()
    }

    fn encode(&self) -> Option<String> {
        serde_json::to_vec(self)
            .ok()
            .map(|json| URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(raw: &str) -> Option<Self> {
        let json = URL_SAFE_NO_PAD.decode(raw).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Per-request handle on the session cookie.
#[derive(Clone)]
pub struct Session {
    cookies: Cookies,
    key: Key,
}

impl Session {
    pub fn new(cookies: Cookies, key: Key) -> Self {
        Self { cookies, key }
    }

    /// Current contents. A missing, tampered or unreadable cookie reads as
    /// an empty session.
    fn load(&self) -> SessionData {
        self.cookies
            .signed(&self.key)
            .get(SESSION_COOKIE)
            .and_then(|cookie| SessionData::decode(cookie.value()))
            .unwrap_or_default()
    }

    fn store(&self, data: &SessionData) {
        let jar = self.cookies.signed(&self.key);
        match data.encode().filter(|_| !data.is_empty()) {
            Some(value) => jar.add(
                Cookie::build((SESSION_COOKIE, value))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .build(),
            ),
            None => jar.remove(Cookie::build(SESSION_COOKIE).path("/").build()),
        }
    }

    fn update(&self, f: impl FnOnce(&mut SessionData)) {
        let mut data = self.load();
        f(&mut data);
        self.store(&data);
    }

    /// The authenticated user id, if the session carries one.
    pub fn user_id(&self) -> Option<DbId> {
        self.load().user_id
    }

    /// Mark the session as authenticated for `user_id`.
    pub fn login(&self, user_id: DbId) {
        self.update(|data| data.user_id = Some(user_id));
    }

    /// Drop the authenticated identity, keeping pending flashes.
    pub fn logout(&self) {
        self.update(|data| data.user_id = None);
    }

    pub fn flash(&self, kind: FlashKind, message: impl Into<String>) {
        let message = message.into();
        self.update(|data| data.flash.push(Flash { kind, message }));
    }

    pub fn flash_success(&self, message: impl Into<String>) {
        self.flash(FlashKind::Success, message);
    }

    pub fn flash_error(&self, message: impl Into<String>) {
        self.flash(FlashKind::Error, message);
    }

    /// Remove and return every pending flash.
    pub fn take_flashes(&self) -> Vec<Flash> {
        let mut data = self.load();
        if data.flash.is_empty() {
            return Vec::new();
        }
        let flashes = std::mem::take(&mut data.flash);
        self.store(&data);
        flashes
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        Ok(Session::new(cookies, state.session_key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Cookies::default(), session_key("test-secret"))
    }

    #[test]
    fn empty_jar_is_anonymous() {
        let s = session();
        assert_eq!(s.user_id(), None);
        assert!(s.take_flashes().is_empty());
    }

    #[test]
    fn login_and_logout_round_trip() {
        let s = session();
        s.login(42);
        assert_eq!(s.user_id(), Some(42));
        s.logout();
        assert_eq!(s.user_id(), None);
    }

    #[test]
    fn flashes_are_read_once_in_order() {
        let s = session();
        s.flash_success("Welcome!");
        s.flash_error("Listing not found");

        let flashes = s.take_flashes();
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].kind, FlashKind::Success);
        assert_eq!(flashes[1].message, "Listing not found");
        assert!(s.take_flashes().is_empty());
    }

    #[test]
    fn handles_on_the_same_jar_see_each_other() {
        let cookies = Cookies::default();
        let key = session_key("test-secret");
        let first = Session::new(cookies.clone(), key.clone());
        let second = Session::new(cookies, key);

        first.login(7);
        second.flash_success("Logged in");
        assert_eq!(first.take_flashes().len(), 1);
        assert_eq!(second.user_id(), Some(7));
    }

    #[test]
    fn cookie_signed_with_another_key_is_ignored() {
        let cookies = Cookies::default();
        Session::new(cookies.clone(), session_key("one")).login(1);
        let other = Session::new(cookies, session_key("two"));
        assert_eq!(other.user_id(), None);
    }

    #[test]
    fn payload_survives_encoding() {
        let data = SessionData {
            user_id: Some(9),
            flash: vec![Flash {
                kind: FlashKind::Error,
                message: "Invalid listing type 'x'; try again".to_string(),
            }],
        };
        let encoded = data.encode().unwrap();
        assert!(!encoded.contains(';'));
        assert_eq!(SessionData::decode(&encoded), Some(data));
    }
}
