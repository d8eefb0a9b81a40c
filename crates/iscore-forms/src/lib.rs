//! # iscore-forms
//!
//! Widgets and form-field metadata for iscore. Nothing here validates
//! submitted data; the list views only need to know which input a model field
//! would be edited with, and how to render it.
//!
//! ## Module Overview
//!
//! - [`widgets`] - The [`Widget`](widgets::Widget) trait and built-in widgets
//! - [`fields`] - [`FormField`](fields::FormField) and its default widgets
//! - [`model_form`] - [`formfield`](model_form::formfield), model field to form field

pub mod fields;
pub mod model_form;
pub mod widgets;

pub use fields::{FormField, FormFieldType};
pub use model_form::formfield;
pub use widgets::{Attrs, Widget, WidgetType};
