//! Per-request session state.
//!
//! [`SessionData`] is the stored form of a session. [`Session`] is the handle
//! a request carries: cheap to clone, shared between the view and the session
//! layer, so anything the view writes (including a flush on logout) is seen
//! when the response is finalized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of generated session keys.
const SESSION_KEY_LENGTH: usize = 32;

/// Data associated with a user session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// The unique session key identifying this session.
    pub session_key: String,
    /// The session data stored as a map of string keys to JSON values.
    pub data: HashMap<String, serde_json::Value>,
    /// The timestamp when this session expires.
    pub expire_date: DateTime<Utc>,
    /// Whether the session data has been modified since it was loaded.
    #[serde(skip)]
    pub modified: bool,
}

impl SessionData {
    /// Creates a new empty session with the given key and a two week lifetime.
    pub fn new(session_key: String) -> Self {
        Self::with_lifetime(session_key, 14 * 24 * 60 * 60)
    }

    /// Creates a new empty session with a lifetime in seconds.
    pub fn with_lifetime(session_key: String, lifetime_seconds: i64) -> Self {
        Self {
            session_key,
            data: HashMap::new(),
            expire_date: Utc::now() + Duration::seconds(lifetime_seconds),
            modified: false,
        }
    }

    /// Returns `true` if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expire_date
    }
}

#[derive(Debug)]
struct SessionState {
    data: SessionData,
    is_new: bool,
    // Keys abandoned by `cycle_key`/`flush`, to be removed from the store.
    stale_keys: Vec<String>,
}

/// A shared, mutable handle to the session of the current request.
///
/// # Examples
///
/// ```
/// use iscore_http::Session;
///
/// let session = Session::new();
/// session.set("_auth_user_id", serde_json::json!("alice"));
/// assert!(session.is_modified());
///
/// let old_key = session.session_key();
/// session.flush();
/// assert!(session.is_empty());
/// assert_ne!(session.session_key(), old_key);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a brand new, empty session with a fresh key.
    pub fn new() -> Self {
        Self::wrap(SessionData::new(generate_session_key()), true)
    }

    /// Creates a new session whose expiry is `lifetime_seconds` from now.
    pub fn with_lifetime(lifetime_seconds: i64) -> Self {
        Self::wrap(
            SessionData::with_lifetime(generate_session_key(), lifetime_seconds),
            true,
        )
    }

    /// Wraps a session loaded from a store.
    pub fn from_data(data: SessionData) -> Self {
        Self::wrap(data, false)
    }

    fn wrap(data: SessionData, is_new: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                data,
                is_new,
                stale_keys: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current session key.
    pub fn session_key(&self) -> String {
        self.lock().data.session_key.clone()
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.lock().data.data.get(key).cloned()
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.data.contains_key(key)
    }

    /// Stores a value and marks the session modified.
    pub fn set(&self, key: &str, value: serde_json::Value) {
        let mut state = self.lock();
        state.data.data.insert(key.to_string(), value);
        state.data.modified = true;
    }

    /// Removes a value, marking the session modified if it was present.
    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        let mut state = self.lock();
        let removed = state.data.data.remove(key);
        if removed.is_some() {
            state.data.modified = true;
        }
        removed
    }

    /// Replaces the session key, keeping the data.
    pub fn cycle_key(&self) {
        let mut state = self.lock();
        let old_key = std::mem::replace(&mut state.data.session_key, generate_session_key());
        if !state.is_new {
            state.stale_keys.push(old_key);
        }
        state.data.modified = true;
    }

    /// Deletes all session data and moves to a new key.
    pub fn flush(&self) {
        {
            let mut state = self.lock();
            state.data.data.clear();
        }
        self.cycle_key();
    }

    /// Returns `true` if the session holds no data.
    pub fn is_empty(&self) -> bool {
        self.lock().data.data.is_empty()
    }

    /// Returns `true` if the session changed during this request.
    pub fn is_modified(&self) -> bool {
        self.lock().data.modified
    }

    /// Returns `true` if the session was not loaded from a store.
    pub fn is_new(&self) -> bool {
        self.lock().is_new
    }

    /// Returns a copy of the current session data.
    pub fn snapshot(&self) -> SessionData {
        self.lock().data.clone()
    }

    /// Drains the keys that were replaced during this request.
    pub fn take_stale_keys(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().stale_keys)
    }
}

/// Generates a random lowercase alphanumeric session key.
pub fn generate_session_key() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(SESSION_KEY_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
