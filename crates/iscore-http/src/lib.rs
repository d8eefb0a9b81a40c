//! # iscore-http
//!
//! HTTP layer for iscore. Provides the request and response types the views
//! work with, query-string handling, cookie helpers, and the session handle
//! carried by every request.

pub mod cookies;
pub mod querydict;
pub mod request;
pub mod response;
pub mod session;

pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{HttpResponse, HttpResponseRedirect};
pub use session::{Session, SessionData};
