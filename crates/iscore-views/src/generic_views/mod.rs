//! Generic views built on a [`ModelCore`](crate::model_core::ModelCore).
//!
//! - [`core_view`] - [`DefaultCoreViewMixin`], the state every core view shares
//! - [`table_views`] - [`TableView`] with its [`Header`] and [`Filter`] resolution
//! - [`auth_views`] - [`LogoutView`]

pub mod auth_views;
pub mod core_view;
pub mod table_views;

pub use auth_views::LogoutView;
pub use core_view::DefaultCoreViewMixin;
pub use table_views::{Filter, Header, TableView};
