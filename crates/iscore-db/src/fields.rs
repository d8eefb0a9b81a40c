//! Field type definitions.
//!
//! Each [`FieldType`] variant corresponds to a kind of model field, and
//! [`FieldDef`] captures the metadata the list views need about one field.

use serde::{Deserialize, Serialize};

/// The kind of a model field.
///
/// Relational variants carry the `app_label.model_name` key of the model
/// they point at, resolved through the [`ModelRegistry`](crate::ModelRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// Auto-incrementing 32-bit integer primary key.
    AutoField,
    /// Auto-incrementing 64-bit integer primary key.
    BigAutoField,
    /// Variable-length string with a max length.
    CharField,
    /// Unlimited-length text.
    TextField,
    /// Email address.
    EmailField,
    /// URL.
    UrlField,
    /// URL-friendly string.
    SlugField,
    /// 32-bit signed integer.
    IntegerField,
    /// 64-bit signed integer.
    BigIntegerField,
    /// 16-bit signed integer.
    SmallIntegerField,
    /// Non-negative integer.
    PositiveIntegerField,
    /// 64-bit floating-point number.
    FloatField,
    /// Fixed-precision decimal number.
    DecimalField {
        /// Maximum total digits.
        max_digits: u32,
        /// Digits after the decimal point.
        decimal_places: u32,
    },
    /// Boolean (true/false).
    BooleanField,
    /// Boolean that also admits NULL.
    NullBooleanField,
    /// Date without time.
    DateField,
    /// Date and time.
    DateTimeField,
    /// Time without date.
    TimeField,
    /// UUID.
    UuidField,
    /// JSON data.
    JsonField,
    /// Many-to-one relationship.
    ForeignKey {
        /// The target model key (e.g. "library.author").
        to: String,
        /// Behavior when the referenced object is deleted.
        on_delete: OnDelete,
    },
    /// One-to-one relationship.
    OneToOneField {
        /// The target model key.
        to: String,
        /// Behavior when the referenced object is deleted.
        on_delete: OnDelete,
    },
    /// Many-to-many relationship.
    ManyToManyField {
        /// The target model key.
        to: String,
    },
}

/// Deletion behavior of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDelete {
    /// Delete all related objects.
    Cascade,
    /// Prevent deletion if related objects exist.
    Protect,
    /// Set the foreign key to NULL.
    SetNull,
    /// Take no action.
    DoNothing,
}

impl FieldType {
    /// Returns the target model key for relational types.
    pub fn related_model(&self) -> Option<&str> {
        match self {
            Self::ForeignKey { to, .. }
            | Self::OneToOneField { to, .. }
            | Self::ManyToManyField { to } => Some(to),
            _ => None,
        }
    }

    /// Returns `true` for auto-incrementing primary key types.
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::AutoField | Self::BigAutoField)
    }
}

/// Definition of a model field.
///
/// # Examples
///
/// ```
/// use iscore_db::{FieldDef, FieldType};
///
/// let field = FieldDef::new("first_name", FieldType::CharField).max_length(100);
/// assert_eq!(field.verbose_name, "first name");
/// assert!(field.editable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: String,
    /// The kind of this field.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed.
    pub null: bool,
    /// Whether the field may be left blank in forms.
    pub blank: bool,
    /// Maximum character length (for CharField and similar).
    pub max_length: Option<usize>,
    /// Human-readable help text.
    pub help_text: String,
    /// Human-readable name for the field.
    pub verbose_name: String,
    /// Allowed values as (value, display label) pairs.
    pub choices: Option<Vec<(String, String)>>,
    /// Whether the field is editable in forms.
    pub editable: bool,
}

impl FieldDef {
    /// Creates a new `FieldDef`. All other attributes take their defaults
    /// (non-null, editable, verbose name derived from `name`).
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            verbose_name: iscore_core::utils::text::verbose_from_name(&name),
            name,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            max_length: None,
            help_text: String::new(),
            choices: None,
            editable: true,
        }
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Allows the field to be left blank.
    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Restricts the field to a fixed set of `(value, label)` choices.
    #[must_use]
    pub fn choices<V, L>(mut self, choices: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        self.choices = Some(
            choices
                .into_iter()
                .map(|(value, label)| (value.into(), label.into()))
                .collect(),
        );
        self
    }

    /// Excludes the field from generated forms.
    #[must_use]
    pub const fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Returns `true` if this field represents a relational field.
    pub fn is_relation(&self) -> bool {
        self.field_type.related_model().is_some()
    }

    /// Returns the target model key if this is a relational field.
    pub fn related_model(&self) -> Option<&str> {
        self.field_type.related_model()
    }
}
