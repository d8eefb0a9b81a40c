//! Model metadata.
//!
//! [`ModelMeta`] describes one model: its labels, its declared fields and the
//! computed columns that can be shown in a list without being stored.

use iscore_core::{IsCoreError, IsCoreResult};
use serde::{Deserialize, Serialize};

use crate::fields::{FieldDef, FieldType};

/// A display-only column backed by a method rather than a stored field.
///
/// Computed columns can appear in a list display, but they cannot be sorted
/// or filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedColumn {
    /// The attribute name used in list displays.
    pub name: String,
    /// The column label.
    pub short_description: String,
}

impl ComputedColumn {
    /// Creates a computed column.
    pub fn new(name: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_description: short_description.into(),
        }
    }
}

/// Metadata about a model.
///
/// A new model gets an implicit `id` auto primary key, which is replaced as
/// soon as a field marked [`primary_key`](FieldDef::primary_key) is added.
///
/// # Examples
///
/// ```
/// use iscore_db::{ComputedColumn, FieldDef, FieldType, ModelMeta};
///
/// let meta = ModelMeta::new("library", "author")
///     .field(FieldDef::new("name", FieldType::CharField).max_length(100))
///     .computed(ComputedColumn::new("book_count", "Number of books"));
///
/// assert_eq!(meta.model_key(), "library.author");
/// assert_eq!(meta.verbose_name_plural, "authors");
/// assert!(meta.get_field("id").is_ok());
/// assert!(meta.get_field("name").is_ok());
/// assert!(meta.get_field("book_count").is_err());
/// assert!(meta.get_computed("book_count").is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    /// The application label (e.g. "library").
    pub app_label: String,
    /// The model name in lowercase (e.g. "book").
    pub model_name: String,
    /// Human-readable singular name.
    pub verbose_name: String,
    /// Human-readable plural name.
    pub verbose_name_plural: String,
    /// Declared fields, in declaration order.
    pub fields: Vec<FieldDef>,
    /// Computed columns available to list displays.
    pub computed: Vec<ComputedColumn>,
}

impl ModelMeta {
    /// Creates metadata for `app_label.model_name` with an implicit `id` key.
    ///
    /// Both names are stored lowercased. The verbose name defaults to the
    /// model name, and the plural to the verbose name with an `s` appended.
    pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into().to_lowercase();
        let verbose_name = iscore_core::utils::text::verbose_from_name(&model_name);
        Self {
            app_label: app_label.into().to_lowercase(),
            verbose_name_plural: format!("{verbose_name}s"),
            verbose_name,
            model_name,
            fields: vec![FieldDef::new("id", FieldType::AutoField)
                .primary_key()
                .verbose_name("ID")],
            computed: Vec::new(),
        }
    }

    /// Sets the singular verbose name. The plural follows unless it was set
    /// explicitly before.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.verbose_name_plural == format!("{}s", self.verbose_name) {
            self.verbose_name_plural = format!("{name}s");
        }
        self.verbose_name = name;
        self
    }

    /// Sets the plural verbose name.
    #[must_use]
    pub fn verbose_name_plural(mut self, name: impl Into<String>) -> Self {
        self.verbose_name_plural = name.into();
        self
    }

    /// Adds a field. A primary key field replaces the implicit `id`.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        if field.primary_key {
            self.fields
                .retain(|f| !(f.primary_key && f.field_type.is_auto() && f.name == "id"));
        }
        self.fields.push(field);
        self
    }

    /// Adds a computed column.
    #[must_use]
    pub fn computed(mut self, column: ComputedColumn) -> Self {
        self.computed.push(column);
        self
    }

    /// Returns the `app_label.model_name` key.
    pub fn model_key(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }

    /// Looks up a declared field by name.
    pub fn get_field(&self, name: &str) -> IsCoreResult<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| IsCoreError::FieldDoesNotExist {
                model: self.model_key(),
                field: name.to_string(),
            })
    }

    /// Looks up a computed column by name.
    pub fn get_computed(&self, name: &str) -> Option<&ComputedColumn> {
        self.computed.iter().find(|c| c.name == name)
    }

    /// Returns the primary key field.
    pub fn pk(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.primary_key)
    }
}
