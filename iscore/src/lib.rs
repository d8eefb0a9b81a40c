//! # iscore
//!
//! Admin scaffolding views for Rust.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on `iscore`
//! to get everything, or on the individual crates for finer-grained control.
//!
//! ```
//! use std::sync::Arc;
//! use iscore::prelude::*;
//!
//! let mut registry = ModelRegistry::new();
//! let book = registry
//!     .register(ModelMeta::new("library", "book")
//!         .field(FieldDef::new("title", FieldType::CharField)))
//!     .unwrap();
//!
//! let mut site = IsCoreSite::new(Settings::default(), registry, Engine::new());
//! site.register(Arc::new(UiModelCore::new(book))).unwrap();
//! let router: iscore::axum::Router = site.into_axum_router();
//! ```

/// Settings, errors and logging.
pub use iscore_core as core;

/// Request, response, query strings, cookies and sessions.
#[cfg(feature = "http")]
pub use iscore_http as http;

/// Model metadata and the model registry.
#[cfg(feature = "db")]
pub use iscore_db as db;

/// Widgets and form fields.
#[cfg(feature = "forms")]
pub use iscore_forms as forms;

/// The template engine.
#[cfg(feature = "template")]
pub use iscore_template as template;

/// Session-based authentication.
#[cfg(feature = "auth")]
pub use iscore_auth as auth;

/// Class-based views, the table and logout views, and the site router.
#[cfg(feature = "views")]
pub use iscore_views as views;

pub use async_trait;
pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// The types most applications need.
#[cfg(feature = "full")]
pub mod prelude {
    pub use iscore_auth::SessionUser;
    pub use iscore_core::{IsCoreError, IsCoreResult, Settings};
    pub use iscore_db::{ComputedColumn, FieldDef, FieldType, ModelMeta, ModelRegistry, OnDelete};
    pub use iscore_http::{HttpRequest, HttpResponse};
    pub use iscore_template::Engine;
    pub use iscore_views::model_core::{ListAction, ListDisplay, ReadPermission, UiModelCore};
    pub use iscore_views::site::IsCoreSite;
    pub use iscore_views::views::class_based::View;
}
