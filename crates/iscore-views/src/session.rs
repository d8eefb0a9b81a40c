//! Session storage and the session layer around view dispatch.
//!
//! A [`SessionBackend`] stores [`SessionData`] by session key. The
//! [`SessionLayer`] attaches the stored session to each request before the
//! view runs, and afterwards writes changes back and sets the cookie.
//!
//! Keys abandoned during a request (by `cycle_key` or `flush`, e.g. on login
//! and logout) are deleted from the store. A session left empty is not
//! stored, and a client that sent a cookie for it is told to drop it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use iscore_core::{IsCoreError, IsCoreResult, Settings};
use iscore_http::cookies::Cookie;
use iscore_http::{HttpRequest, HttpResponse, Session, SessionData};

/// Storage for sessions.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Loads the unexpired session stored under `session_key`.
    ///
    /// Fails with `NotFound` if there is none.
    async fn load(&self, session_key: &str) -> IsCoreResult<SessionData>;

    /// Stores `session` under its key.
    async fn save(&self, session: &SessionData) -> IsCoreResult<()>;

    /// Deletes the session stored under `session_key`, if any.
    async fn delete(&self, session_key: &str) -> IsCoreResult<()>;

    /// Returns `true` if an unexpired session is stored under `session_key`.
    async fn exists(&self, session_key: &str) -> IsCoreResult<bool>;

    /// Removes all expired sessions.
    async fn clear_expired(&self) -> IsCoreResult<()>;
}

/// An in-memory session backend. Sessions are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionBackend {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl InMemorySessionBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionBackend for InMemorySessionBackend {
    async fn load(&self, session_key: &str) -> IsCoreResult<SessionData> {
        self.sessions
            .read()
            .await
            .get(session_key)
            .filter(|s| !s.is_expired())
            .cloned()
            .ok_or_else(|| IsCoreError::NotFound(format!("session '{session_key}'")))
    }

    async fn save(&self, session: &SessionData) -> IsCoreResult<()> {
        let mut stored = session.clone();
        stored.modified = false;
        self.sessions
            .write()
            .await
            .insert(stored.session_key.clone(), stored);
        Ok(())
    }

    async fn delete(&self, session_key: &str) -> IsCoreResult<()> {
        self.sessions.write().await.remove(session_key);
        Ok(())
    }

    async fn exists(&self, session_key: &str) -> IsCoreResult<bool> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_key)
            .is_some_and(|s| !s.is_expired()))
    }

    async fn clear_expired(&self) -> IsCoreResult<()> {
        self.sessions
            .write()
            .await
            .retain(|_, session| !session.is_expired());
        Ok(())
    }
}

/// Loads sessions before dispatch and saves them after.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use iscore_views::session::{InMemorySessionBackend, SessionLayer};
///
/// let layer = SessionLayer::new(Arc::new(InMemorySessionBackend::new()))
///     .cookie_name("backoffice_session");
/// assert_eq!(layer.get_cookie_name(), "backoffice_session");
/// ```
#[derive(Clone)]
pub struct SessionLayer {
    backend: Arc<dyn SessionBackend>,
    cookie_name: String,
    cookie_age: i64,
    cookie_secure: bool,
}

impl std::fmt::Debug for SessionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLayer")
            .field("cookie_name", &self.cookie_name)
            .field("cookie_age", &self.cookie_age)
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}

impl SessionLayer {
    /// Creates a layer over `backend` with the default cookie settings.
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        let defaults = Settings::default();
        Self::from_settings(&defaults, backend)
    }

    /// Creates a layer using the `session_cookie_*` settings.
    pub fn from_settings(settings: &Settings, backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            backend,
            cookie_name: settings.session_cookie_name.clone(),
            cookie_age: i64::try_from(settings.session_cookie_age).unwrap_or(i64::MAX),
            cookie_secure: settings.session_cookie_secure,
        }
    }

    /// Sets the cookie name.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Returns the cookie name.
    pub fn get_cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<dyn SessionBackend> {
        &self.backend
    }

    /// Attaches the session named by the request's cookie, or a new one.
    pub async fn load(&self, request: &mut HttpRequest) {
        let stored = match request.cookie(&self.cookie_name) {
            Some(key) => match self.backend.load(key).await {
                Ok(data) => Some(data),
                Err(IsCoreError::NotFound(_)) => {
                    tracing::debug!("session cookie names no stored session");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load session");
                    None
                }
            },
            None => None,
        };
        let session = stored.map_or_else(|| Session::with_lifetime(self.cookie_age), Session::from_data);
        request.set_session(session);
    }

    /// Returns `true` if the request carries a session cookie.
    pub fn has_cookie(&self, request: &HttpRequest) -> bool {
        request.cookie(&self.cookie_name).is_some()
    }

    /// Writes `session` back and sets the cookie on `response`.
    ///
    /// `sent_cookie` tells whether the request carried a session cookie,
    /// which an emptied session must clear.
    pub async fn save(&self, session: &Session, sent_cookie: bool, response: &mut HttpResponse) {
        for stale in session.take_stale_keys() {
            if let Err(e) = self.backend.delete(&stale).await {
                tracing::warn!(error = %e, "failed to delete replaced session");
            }
        }

        if session.is_empty() {
            if sent_cookie {
                append_cookie(response, &Cookie::removal(&self.cookie_name));
            }
            return;
        }
        if !session.is_modified() {
            return;
        }

        let data = session.snapshot();
        if let Err(e) = self.backend.save(&data).await {
            tracing::error!(error = %e, "failed to save session");
            return;
        }
        let cookie = Cookie::new(&self.cookie_name, data.session_key)
            .max_age(self.cookie_age)
            .http_only(true)
            .secure(self.cookie_secure);
        append_cookie(response, &cookie);
    }
}

fn append_cookie(response: &mut HttpResponse, cookie: &Cookie) {
    match http::HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response
                .headers_mut()
                .append(http::header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!(cookie = cookie.name(), error = %e, "invalid Set-Cookie header"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(backend: &Arc<InMemorySessionBackend>) -> SessionLayer {
        SessionLayer::new(Arc::clone(backend) as Arc<dyn SessionBackend>)
    }

    fn request_with_cookie(cookie: Option<&str>) -> HttpRequest {
        let mut builder = HttpRequest::builder().path("/");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        builder.build()
    }

    fn set_cookies(response: &HttpResponse) -> Vec<String> {
        response
            .headers()
            .get_all(http::header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_backend_roundtrip_and_expiry() {
        let backend = InMemorySessionBackend::new();
        let mut data = SessionData::new("live".into());
        data.data.insert("k".into(), serde_json::json!(1));
        backend.save(&data).await.unwrap();
        backend
            .save(&SessionData::with_lifetime("dead".into(), -10))
            .await
            .unwrap();

        assert_eq!(backend.load("live").await.unwrap().data["k"], 1);
        assert!(backend.exists("live").await.unwrap());
        assert!(matches!(
            backend.load("dead").await.unwrap_err(),
            IsCoreError::NotFound(_)
        ));
        assert!(!backend.exists("dead").await.unwrap());

        backend.clear_expired().await.unwrap();
        assert_eq!(backend.len().await, 1);
        backend.delete("live").await.unwrap();
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_untouched_new_session_is_not_stored() {
        let backend = Arc::new(InMemorySessionBackend::new());
        let layer = layer(&backend);
        let mut request = request_with_cookie(None);
        layer.load(&mut request).await;
        assert!(request.session().is_new());

        let mut response = HttpResponse::ok("");
        layer
            .save(request.session(), layer.has_cookie(&request), &mut response)
            .await;
        assert!(set_cookies(&response).is_empty());
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_modified_session_is_stored_and_reloaded() {
        let backend = Arc::new(InMemorySessionBackend::new());
        let layer = layer(&backend);

        let mut request = request_with_cookie(None);
        layer.load(&mut request).await;
        request.session().set("theme", serde_json::json!("dark"));
        let mut response = HttpResponse::ok("");
        layer
            .save(request.session(), layer.has_cookie(&request), &mut response)
            .await;

        let key = request.session().session_key();
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(&format!("sessionid={key}; Path=/; Max-Age=1209600; HttpOnly")));

        let mut next = request_with_cookie(Some(&format!("sessionid={key}")));
        layer.load(&mut next).await;
        assert!(!next.session().is_new());
        assert_eq!(next.session().get("theme"), Some(serde_json::json!("dark")));

        let mut response = HttpResponse::ok("");
        layer
            .save(next.session(), layer.has_cookie(&next), &mut response)
            .await;
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_cookie_gets_fresh_session() {
        let backend = Arc::new(InMemorySessionBackend::new());
        let layer = layer(&backend);
        let mut request = request_with_cookie(Some("sessionid=forged"));
        layer.load(&mut request).await;
        assert!(request.session().is_new());
        assert_ne!(request.session().session_key(), "forged");
    }

    #[tokio::test]
    async fn test_flushed_session_is_deleted_and_cookie_removed() {
        let backend = Arc::new(InMemorySessionBackend::new());
        let mut data = SessionData::new("stored".into());
        data.data.insert("_auth_user_id".into(), serde_json::json!("alice"));
        backend.save(&data).await.unwrap();
        let layer = layer(&backend);

        let mut request = request_with_cookie(Some("sessionid=stored"));
        layer.load(&mut request).await;
        request.session().flush();
        let mut response = HttpResponse::ok("");
        layer
            .save(request.session(), layer.has_cookie(&request), &mut response)
            .await;

        assert!(!backend.exists("stored").await.unwrap());
        assert!(backend.is_empty().await);
        assert_eq!(
            set_cookies(&response),
            vec!["sessionid=; Path=/; Max-Age=0; SameSite=Lax".to_string()]
        );
    }

    #[tokio::test]
    async fn test_cycled_key_replaces_stored_session() {
        let backend = Arc::new(InMemorySessionBackend::new());
        let mut data = SessionData::new("old".into());
        data.data.insert("cart".into(), serde_json::json!([1]));
        backend.save(&data).await.unwrap();
        let layer = layer(&backend);

        let mut request = request_with_cookie(Some("sessionid=old"));
        layer.load(&mut request).await;
        request.session().cycle_key();
        let mut response = HttpResponse::ok("");
        layer
            .save(request.session(), layer.has_cookie(&request), &mut response)
            .await;

        let new_key = request.session().session_key();
        assert!(!backend.exists("old").await.unwrap());
        assert!(backend.exists(&new_key).await.unwrap());
    }
}
