//! HTTP request type.
//!
//! [`HttpRequest`] carries the method, path, headers and query parameters of
//! an incoming request, plus the [`Session`] attached by the session layer.

use std::collections::HashMap;
use std::sync::OnceLock;

use http::{HeaderMap, Method};

use crate::cookies;
use crate::querydict::QueryDict;
use crate::session::Session;

/// An incoming HTTP request.
///
/// Instances are created from an axum request via [`HttpRequest::from_axum`]
/// or, in tests, through [`HttpRequest::builder`].
///
/// # Examples
///
/// ```
/// use iscore_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/library/books/")
///     .query_string("title__contains=rust")
///     .build();
///
/// assert_eq!(request.path(), "/library/books/");
/// assert_eq!(request.get().get("title__contains"), Some("rust"));
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    method: Method,
    path: String,
    get: QueryDict,
    headers: HeaderMap,
    cached_cookies: OnceLock<HashMap<String, String>>,
    session: Session,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`].
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from axum request parts.
    ///
    /// The session starts out empty; the session layer replaces it with the
    /// stored one.
    pub fn from_axum(parts: http::request::Parts) -> Self {
        Self {
            get: QueryDict::parse(parts.uri.query().unwrap_or("")),
            path: parts.uri.path().to_string(),
            method: parts.method,
            headers: parts.headers,
            cached_cookies: OnceLock::new(),
            session: Session::new(),
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the GET query parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.get
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the cookies sent with the request, parsed once and cached.
    pub fn cookies(&self) -> &HashMap<String, String> {
        self.cached_cookies.get_or_init(|| {
            self.headers
                .get(http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .map_or_else(HashMap::new, cookies::parse_cookie_header)
        })
    }

    /// Gets a specific cookie value by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies().get(name).map(String::as_str)
    }

    /// Returns the session attached to this request.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Replaces the session attached to this request.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }
}

/// Builder for constructing [`HttpRequest`] instances in tests.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    session: Option<Session>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            headers: HeaderMap::new(),
            session: None,
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Attaches an existing session.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            get: QueryDict::parse(&self.query_string),
            method: self.method,
            path: self.path,
            headers: self.headers,
            cached_cookies: OnceLock::new(),
            session: self.session.unwrap_or_default(),
        }
    }
}
