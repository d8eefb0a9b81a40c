//! Settings for iscore.
//!
//! [`Settings`] holds everything the views, the session layer and the demo
//! server read at runtime. [`LazySettings`] is a write-once global, exposed
//! as [`SETTINGS`], for applications that prefer not to thread the struct
//! through by hand.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of iscore settings.
///
/// Every field has a default, so a configuration file only needs to list
/// what it changes.
///
/// # Examples
///
/// ```
/// use iscore_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.site_name, "iscore");
/// assert_eq!(settings.session_cookie_name, "sessionid");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The secret key used for session key generation salts.
    pub secret_key: String,
    /// Namespace used when building route names such as `"<site>:add-<group>"`.
    pub site_name: String,
    /// Address the demo server binds to.
    pub bind_address: String,

    // ── Templates ────────────────────────────────────────────────────

    /// Directories searched for `*.html` templates. Files found here
    /// override the built-in templates with the same name.
    pub template_dirs: Vec<PathBuf>,

    // ── Sessions / auth ──────────────────────────────────────────────

    /// The name of the session cookie.
    pub session_cookie_name: String,
    /// The session cookie max age in seconds.
    pub session_cookie_age: u64,
    /// Whether the session cookie is flagged `Secure`.
    pub session_cookie_secure: bool,
    /// Where anonymous users are sent to log in.
    pub login_url: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level filter (e.g. "info", "debug", "iscore_views=trace").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            secret_key: String::new(),
            site_name: "iscore".to_string(),
            bind_address: "127.0.0.1:8000".to_string(),
            template_dirs: Vec::new(),
            session_cookie_name: "sessionid".to_string(),
            session_cookie_age: 1_209_600, // 2 weeks
            session_cookie_secure: false,
            login_url: "/login/".to_string(),
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then use
/// [`get`](LazySettings::get) anywhere.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings.
    ///
    /// Returns the rejected settings if the global was already configured.
    pub fn configure(&self, settings: Settings) -> Result<(), Settings> {
        self.inner.set(settings)
    }

    /// Returns the configured settings, or the defaults if nothing was
    /// configured yet.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured or read.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl std::fmt::Debug for LazySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazySettings")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert!(s.secret_key.is_empty());
        assert_eq!(s.site_name, "iscore");
        assert_eq!(s.session_cookie_age, 1_209_600);
        assert!(!s.session_cookie_secure);
        assert_eq!(s.log_level, "info");
        assert!(s.template_dirs.is_empty());
    }

    #[test]
    fn test_lazy_settings_configure_once() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        let settings = Settings {
            site_name: "backoffice".to_string(),
            ..Settings::default()
        };
        assert!(lazy.configure(settings).is_ok());
        assert_eq!(lazy.get().site_name, "backoffice");

        let rejected = lazy.configure(Settings::default()).unwrap_err();
        assert_eq!(rejected.site_name, "iscore");
        assert_eq!(lazy.get().site_name, "backoffice");
    }

    #[test]
    fn test_lazy_settings_falls_back_to_defaults() {
        let lazy = LazySettings::new();
        assert_eq!(lazy.get().site_name, "iscore");
        assert!(lazy.is_configured());
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_cookie_name, s.session_cookie_name);
    }
}
