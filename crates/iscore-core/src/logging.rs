//! Logging integration.
//!
//! Configures a [`tracing`] subscriber from [`Settings`] and provides the
//! span wrapped around each request handled by the site router.

use crate::settings::Settings;

/// Installs the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` and falls back to `info`
/// when it does not parse. Debug mode uses the pretty formatter; otherwise
/// log lines are emitted as JSON. Calling this twice is harmless: the
/// second subscriber is silently discarded.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for an HTTP request.
///
/// # Examples
///
/// ```
/// use iscore_core::logging::request_span;
///
/// let span = request_span("GET", "/library/books/");
/// let _guard = span.enter();
/// tracing::info!("handling request");
/// ```
pub fn request_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("request", method = method, path = path)
}
