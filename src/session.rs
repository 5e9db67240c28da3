//! Session gateway: opaque per-browser tokens mapped server-side to the
//! authenticated user. A browser is Anonymous until login stores a record
//! here; logout (or expiry) returns it to Anonymous.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "otaku_session";

/// What the session carries about the authenticated user. `update_name`
/// patches this in place so pages reflect a rename without re-login.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone)]
struct SessionRecord {
    user: SessionUser,
    expires_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    inner: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Anonymous -> Authenticated. Returns the opaque token handed to the
    /// browser as a cookie. Each login also sweeps records whose TTL has
    /// elapsed, so sessions abandoned by browsers that never come back do
    /// not accumulate for the life of the process.
    pub fn open(&self, user: SessionUser) -> Uuid {
        let token = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.write();
        sessions.retain(|_, record| record.expires_at > now);
        sessions.insert(
            token,
            SessionRecord {
                user,
                expires_at: now + self.ttl,
            },
        );
        debug!(%token, "session opened");
        token
    }

    /// Expired records count as Anonymous and are evicted on access.
    pub fn get(&self, token: Uuid) -> Option<SessionUser> {
        let mut sessions = self.write();
        match sessions.get(&token) {
            Some(record) if record.expires_at > OffsetDateTime::now_utc() => {
                Some(record.user.clone())
            }
            Some(_) => {
                sessions.remove(&token);
                debug!(%token, "expired session evicted");
                None
            }
            None => None,
        }
    }

    /// Keeps the live session in sync after a profile rename.
    pub fn set_name(&self, token: Uuid, name: &str) -> bool {
        match self.write().get_mut(&token) {
            Some(record) => {
                record.user.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Back to Anonymous. Idempotent.
    pub fn close(&self, token: Uuid) {
        self.write().remove(&token);
        debug!(%token, "session closed");
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SessionRecord>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn token_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == SESSION_COOKIE {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

pub fn session_cookie(token: Uuid, ttl: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.whole_seconds()
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extractor for restricted API routes. Rejects with the 401 JSON envelope
/// when the browser is Anonymous.
pub struct Authenticated {
    pub token: Uuid,
    pub user: SessionUser,
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(ApiError::NotAuthenticated)?;
        let user = state
            .sessions
            .get(token)
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(Authenticated { token, user })
    }
}

/// Extractor for page routes: never rejects, handlers redirect to `/login`
/// themselves when the browser is Anonymous.
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = token_from_headers(&parts.headers).and_then(|token| state.sessions.get(token));
        Ok(MaybeUser(user))
    }
}
