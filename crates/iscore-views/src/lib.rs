//! # iscore-views
//!
//! The view layer of iscore: class-based views, the list/table view with its
//! header and filter resolution, the logout view, the session store and the
//! [`IsCoreSite`](site::IsCoreSite) that wires everything into an axum router.
//!
//! ## Modules
//!
//! - [`views`] - The [`View`](views::class_based::View) trait, mixins and `TemplateView`
//! - [`generic_views`] - `DefaultCoreViewMixin`, `TableView`, `LogoutView`
//! - [`model_core`] - The [`ModelCore`](model_core::ModelCore) collaborator and `UiModelCore`
//! - [`session`] - Session backends and the [`SessionLayer`](session::SessionLayer)
//! - [`site`] - [`IsCoreSite`](site::IsCoreSite), the router builder
//! - [`utils`] - Query-string helpers

pub mod generic_views;
pub mod model_core;
pub mod session;
pub mod site;
pub mod utils;
pub mod views;

pub use generic_views::{DefaultCoreViewMixin, Filter, Header, LogoutView, TableView};
pub use model_core::{DefaultListFilter, ListAction, ListDisplay, ModelCore, ReadPermission, UiModelCore};
pub use session::{InMemorySessionBackend, SessionBackend, SessionLayer};
pub use site::IsCoreSite;
pub use views::class_based::{ContextMixin, TemplateResponseMixin, TemplateView, View};
