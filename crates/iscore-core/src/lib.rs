//! # iscore-core
//!
//! Foundation types shared by every iscore crate. Nothing in here knows about
//! HTTP or models; it only carries configuration, errors and logging setup.
//!
//! ## Modules
//!
//! - [`error`] - The [`IsCoreError`] enum and result alias
//! - [`settings`] - Configuration struct and the global [`SETTINGS`] holder
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - `tracing` subscriber setup and request spans
//! - [`utils`] - Small text and HTML helpers

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

pub use error::{IsCoreError, IsCoreResult};
pub use settings::{Settings, SETTINGS};
