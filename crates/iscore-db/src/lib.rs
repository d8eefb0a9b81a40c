//! # iscore-db
//!
//! Model metadata for iscore. The views never touch a database; they only need
//! to know which fields a model declares, what kind they are and how they are
//! labelled, so this crate carries exactly that.
//!
//! ## Module Overview
//!
//! - [`fields`] - [`FieldType`] and the [`FieldDef`] builder
//! - [`model`] - [`ModelMeta`] and [`ComputedColumn`]
//! - [`registry`] - [`ModelRegistry`], used to follow relations by model key

// FieldDef mirrors the field options of the admin it scaffolds, which are flags.
#![allow(clippy::struct_excessive_bools)]

pub mod fields;
pub mod model;
pub mod registry;

pub use fields::{FieldDef, FieldType, OnDelete};
pub use model::{ComputedColumn, ModelMeta};
pub use registry::ModelRegistry;

/// Separator between segments of a field path, e.g. `author__name`.
pub const LOOKUP_SEP: &str = "__";
