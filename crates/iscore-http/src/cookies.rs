//! Cookie parsing and `Set-Cookie` construction.

use std::collections::HashMap;
use std::fmt;

/// The `SameSite` attribute for cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Cookies are only sent on same-site requests.
    Strict,
    /// Cookies are sent with top-level navigations.
    Lax,
    /// Cookies are sent with all requests (requires Secure).
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Lax => write!(f, "Lax"),
            Self::None => write!(f, "None"),
        }
    }
}

/// Parses a `Cookie` request header into a name -> value map.
///
/// Malformed segments (no `=`) are skipped. When a name repeats, the first
/// occurrence wins, matching browser precedence for the most specific path.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for segment in header.split(';') {
        if let Some((name, value)) = segment.trim().split_once('=') {
            let name = name.trim();
            if !name.is_empty() {
                cookies
                    .entry(name.to_string())
                    .or_insert_with(|| value.trim().trim_matches('"').to_string());
            }
        }
    }
    cookies
}

/// A cookie to be sent in a `Set-Cookie` response header.
///
/// # Examples
///
/// ```
/// use iscore_http::cookies::Cookie;
///
/// let header = Cookie::new("sessionid", "abc").max_age(60).http_only(true).to_string();
/// assert_eq!(header, "sessionid=abc; Path=/; Max-Age=60; HttpOnly; SameSite=Lax");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: String,
    max_age: Option<i64>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl Cookie {
    /// Creates a cookie with `Path=/` and `SameSite=Lax`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            max_age: None,
            secure: false,
            http_only: false,
            same_site: Some(SameSite::Lax),
        }
    }

    /// Creates a cookie that instructs the browser to drop `name` immediately.
    pub fn removal(name: impl Into<String>) -> Self {
        Self::new(name, "").max_age(0)
    }

    /// Sets the cookie path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets `Max-Age` in seconds.
    #[must_use]
    pub const fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Sets the `Secure` flag.
    #[must_use]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the `HttpOnly` flag.
    #[must_use]
    pub const fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets or clears the `SameSite` attribute.
    #[must_use]
    pub const fn same_site(mut self, same_site: Option<SameSite>) -> Self {
        self.same_site = same_site;
        self
    }

    /// Returns the cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)?;
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("sessionid=abc123; theme=\"dark\" ; broken; =x");
        assert_eq!(cookies.get("sessionid").map(String::as_str), Some("abc123"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn test_parse_cookie_header_first_wins() {
        let cookies = parse_cookie_header("a=1; a=2");
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_cookie_display_all_flags() {
        let cookie = Cookie::new("sid", "v")
            .path("/admin")
            .max_age(10)
            .secure(true)
            .http_only(true)
            .same_site(Some(SameSite::Strict));
        assert_eq!(
            cookie.to_string(),
            "sid=v; Path=/admin; Max-Age=10; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_removal_cookie() {
        let cookie = Cookie::removal("sid").same_site(None);
        assert_eq!(cookie.to_string(), "sid=; Path=/; Max-Age=0");
        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "");
    }
}
