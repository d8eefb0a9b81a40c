//! Error types for iscore.
//!
//! [`IsCoreError`] covers the HTTP-facing failures a view can produce, the
//! metadata lookup failures raised while resolving list columns, and the
//! configuration and template errors raised at startup or render time.

use thiserror::Error;

/// The primary error type for iscore.
///
/// Each variant maps to an HTTP status code via [`IsCoreError::status_code`],
/// so views can turn any failure into a response without extra bookkeeping.
///
/// # Examples
///
/// ```
/// use iscore_core::IsCoreError;
///
/// let err = IsCoreError::FieldDoesNotExist {
///     model: "library.book".to_string(),
///     field: "isbn".to_string(),
/// };
/// assert_eq!(err.status_code(), 500);
/// assert_eq!(err.to_string(), "library.book has no field named 'isbn'");
/// ```
#[derive(Error, Debug)]
pub enum IsCoreError {
    // ── HTTP errors ──────────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 403 Forbidden / Permission Denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 405 Method Not Allowed.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// HTTP 500 Internal Server Error.
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    // ── Model metadata ───────────────────────────────────────────────

    /// A field path named neither a model field nor a computed column.
    #[error("{model} has no field named '{field}'")]
    FieldDoesNotExist {
        /// The `app_label.model_name` key of the model that was searched.
        model: String,
        /// The field name that could not be found.
        field: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The application is wired up inconsistently (e.g. a relation points
    /// at a model that was never registered).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Templates ────────────────────────────────────────────────────

    /// The requested template was not found.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    /// A template failed to parse or render.
    #[error("Template error: {0}")]
    TemplateError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IsCoreError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest` -> 400
    /// - `PermissionDenied` -> 403
    /// - `NotFound` -> 404
    /// - `MethodNotAllowed` -> 405
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::PermissionDenied(_) => 403,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::InternalServerError(_)
            | Self::FieldDoesNotExist { .. }
            | Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::TemplateDoesNotExist(_)
            | Self::TemplateError(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for IsCoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, IsCoreError>`.
pub type IsCoreResult<T> = Result<T, IsCoreError>;
