//! Auth-session integration.
//!
//! ## Session Keys
//!
//! - `_auth_user_id` - the authenticated user's username
//! - `_auth_user` - the serialized [`SessionUser`]
//!
//! Both are written by [`login`]; [`logout`] flushes the whole session.

use iscore_http::HttpRequest;

use crate::user::SessionUser;

/// Session key for the authenticated user's identifier.
pub const SESSION_USER_ID_KEY: &str = "_auth_user_id";
/// Session key for the serialized user.
pub const SESSION_USER_KEY: &str = "_auth_user";

/// Stores `user` in the request's session.
///
/// The session key is always cycled. Logging in as a different user than
/// the one already stored flushes the previous session data as well.
pub fn login(request: &HttpRequest, user: &SessionUser) {
    let session = request.session();
    let switching_user = session
        .get(SESSION_USER_ID_KEY)
        .is_some_and(|id| id.as_str() != Some(user.username.as_str()));
    if switching_user {
        session.flush();
    } else {
        session.cycle_key();
    }

    session.set(
        SESSION_USER_ID_KEY,
        serde_json::Value::String(user.username.clone()),
    );
    match serde_json::to_value(user) {
        Ok(value) => session.set(SESSION_USER_KEY, value),
        Err(e) => tracing::error!(error = %e, "failed to serialize session user"),
    }
    tracing::info!(user = %user.username, "user logged in");
}

/// Ends the authenticated session: all session data is removed and the
/// session moves to a fresh key.
pub fn logout(request: &HttpRequest) {
    let session = request.session();
    if let Some(user) = get_user(request) {
        tracing::info!(user = %user.username, "user logged out");
    }
    session.flush();
}

/// Returns `true` if the request's session holds an authenticated user.
pub fn is_authenticated(request: &HttpRequest) -> bool {
    request
        .session()
        .get(SESSION_USER_ID_KEY)
        .is_some_and(|id| id.as_str().is_some_and(|s| !s.is_empty()))
}

/// Returns the user stored in the session, if any.
///
/// A session whose stored user does not deserialize, or does not match the
/// stored identifier, is treated as anonymous.
pub fn get_user(request: &HttpRequest) -> Option<SessionUser> {
    let session = request.session();
    let user_id = session.get(SESSION_USER_ID_KEY)?;
    let user: SessionUser = serde_json::from_value(session.get(SESSION_USER_KEY)?).ok()?;
    (user_id.as_str() == Some(user.username.as_str())).then_some(user)
}
