use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::DriveUser;

pub const SESSION_COOKIE: &str = "enspired_session";
/// Binds an OAuth round trip to the browser that started it
pub const LOGIN_STATE_COOKIE: &str = "enspired_oauth_state";

/// How long a signed-in session stays valid
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);
/// How long a consent screen may take before its state token lapses
pub const LOGIN_STATE_TTL: Duration = Duration::from_secs(10 * 60);

const MAX_SESSIONS: usize = 10_000;
const MAX_PENDING_STATES: usize = 1_000;

/// A signed-in visitor; the token lives only in process memory
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: Option<DriveUser>,
}

#[derive(Debug)]
struct Timed<T> {
    value: T,
    created: Instant,
}

impl<T> Timed<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            created: Instant::now(),
        }
    }

    fn is_live(&self, ttl: Duration) -> bool {
        self.created.elapsed() < ttl
    }
}

/// Drop expired entries, then the oldest ones while over `cap`
fn prune<T>(entries: &mut HashMap<String, Timed<T>>, ttl: Duration, cap: usize) {
    entries.retain(|_, entry| entry.is_live(ttl));

    while entries.len() >= cap {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.created)
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => {
                entries.remove(&key);
            }
            None => break,
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Timed<Session>>>,
    pending_states: RwLock<HashMap<String, Timed<()>>>,
    session_ttl: Duration,
    state_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttls(SESSION_TTL, LOGIN_STATE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttls(session_ttl: Duration, state_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            pending_states: RwLock::new(HashMap::new()),
            session_ttl,
            state_ttl,
        }
    }

    /// Start an OAuth round trip and remember its state token
    pub async fn begin_login(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let mut pending = self.pending_states.write().await;
        prune(&mut pending, self.state_ttl, MAX_PENDING_STATES);
        pending.insert(state.clone(), Timed::new(()));
        state
    }

    /// Consume a state token; each one is good for a single callback and
    /// only until it lapses
    pub async fn finish_login(&self, state: &str) -> bool {
        match self.pending_states.write().await.remove(state) {
            Some(entry) => entry.is_live(self.state_ttl),
            None => false,
        }
    }

    pub async fn create(&self, session: Session) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        prune(&mut sessions, self.session_ttl, MAX_SESSIONS);
        sessions.insert(id.clone(), Timed::new(session));
        debug!("{} live sessions", sessions.len());
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(id)
            .filter(|entry| entry.is_live(self.session_ttl))
            .map(|entry| entry.value.clone())
    }

    pub async fn set_user(&self, id: &str, user: DriveUser) {
        if let Some(entry) = self.sessions.write().await.get_mut(id) {
            entry.value.user = Some(user);
        }
    }

    pub async fn remove(&self, id: &str) -> Option<Session> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|entry| entry.value)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Session attached to a request, if any
    pub async fn from_headers(&self, headers: &HeaderMap) -> Option<(String, Session)> {
        let id = session_id(headers)?;
        let session = self.get(&id).await?;
        Some((id, session))
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Session id from the request's `Cookie` headers
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE)
}

/// OAuth state this browser was handed at `/auth/login`
pub fn login_state(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, LOGIN_STATE_COOKIE)
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(id: &str) -> String {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(SESSION_TTL.as_secs() as i64))
        .build()
        .to_string()
}

/// `Set-Cookie` value that drops the session cookie
pub fn clear_session_cookie() -> String {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .to_string()
}

/// `Set-Cookie` value carrying the state of a login in progress.
///
/// Lax so it still comes back on the top-level redirect from Google.
pub fn login_state_cookie(state: &str) -> String {
    Cookie::build((LOGIN_STATE_COOKIE, state.to_string()))
        .path("/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(LOGIN_STATE_TTL.as_secs() as i64))
        .build()
        .to_string()
}

pub fn clear_login_state_cookie() -> String {
    Cookie::build((LOGIN_STATE_COOKIE, ""))
        .path("/auth")
        .http_only(true)
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .to_string()
}
