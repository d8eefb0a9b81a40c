//! # iscore-auth
//!
//! Session-based authentication for iscore. A logged-in user is nothing more
//! than a [`SessionUser`] stored in the request's session; the helpers in
//! [`session_auth`] put it there, read it back and remove it again.

pub mod session_auth;
pub mod user;

pub use session_auth::{get_user, is_authenticated, login, logout};
pub use user::SessionUser;
