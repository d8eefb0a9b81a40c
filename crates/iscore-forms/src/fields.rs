//! Form field definitions.
//!
//! A [`FormField`] describes an input a form would show for one value: what
//! kind of data it accepts, how it is labelled and which widget renders it.

use crate::widgets::{build_widget, Widget, WidgetType};

/// The blank choice shown first in select widgets.
pub const BLANK_CHOICE: (&str, &str) = ("", "---------");

/// The kind of data a form field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
    },
    /// A floating-point field.
    Float,
    /// A fixed-precision decimal field.
    Decimal {
        /// Maximum total number of digits.
        max_digits: u32,
        /// Number of digits after the decimal point.
        decimal_places: u32,
    },
    /// A boolean field.
    Boolean,
    /// A boolean field that also accepts "unknown".
    NullBoolean,
    /// A date field.
    Date,
    /// A date-time field.
    DateTime,
    /// A time field.
    Time,
    /// An email field.
    Email,
    /// A URL field.
    Url,
    /// A slug field.
    Slug,
    /// A UUID field.
    Uuid,
    /// A JSON document.
    Json,
    /// A field limited to a fixed set of choices.
    Choice {
        /// The available choices as `(value, label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A reference to one instance of another model.
    ModelChoice {
        /// The target model key.
        to: String,
    },
    /// A reference to several instances of another model.
    ModelMultipleChoice {
        /// The target model key.
        to: String,
    },
}

/// Returns the default widget type for a given form field type.
pub const fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. }
        | FormFieldType::Slug
        | FormFieldType::Uuid => WidgetType::TextInput,
        FormFieldType::Integer { .. } | FormFieldType::Float | FormFieldType::Decimal { .. } => {
            WidgetType::NumberInput
        }
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::NullBoolean
        | FormFieldType::Choice { .. }
        | FormFieldType::ModelChoice { .. } => WidgetType::Select,
        FormFieldType::ModelMultipleChoice { .. } => WidgetType::SelectMultiple,
        FormFieldType::Date => WidgetType::DateInput,
        FormFieldType::DateTime => WidgetType::DateTimeInput,
        FormFieldType::Time => WidgetType::TimeInput,
        FormFieldType::Email => WidgetType::EmailInput,
        FormFieldType::Url => WidgetType::UrlInput,
        FormFieldType::Json => WidgetType::Textarea,
    }
}

/// A form field definition.
///
/// # Examples
///
/// ```
/// use iscore_forms::fields::{FormField, FormFieldType};
/// use iscore_forms::widgets::WidgetType;
///
/// let field = FormField::new("pages", FormFieldType::Integer { min_value: Some(0) });
/// assert_eq!(field.widget_type, WidgetType::NumberInput);
/// assert_eq!(field.label, "Pages");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// The field name.
    pub name: String,
    /// The kind of data accepted.
    pub field_type: FormFieldType,
    /// The label shown next to the input.
    pub label: String,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Help text shown below the input.
    pub help_text: String,
    /// The widget used to render the field.
    pub widget_type: WidgetType,
}

impl FormField {
    /// Creates a required field with the default widget for its type.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        Self {
            label: iscore_core::utils::text::capfirst(
                &iscore_core::utils::text::verbose_from_name(&name),
            ),
            widget_type: default_widget_for_field_type(&field_type),
            name,
            field_type,
            required: true,
            help_text: String::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets whether the field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Overrides the widget.
    #[must_use]
    pub const fn widget(mut self, widget_type: WidgetType) -> Self {
        self.widget_type = widget_type;
        self
    }

    /// Returns the choices the field's select widget offers.
    ///
    /// Relation fields only offer the blank choice here; listing the related
    /// rows is the job of whoever renders the page.
    pub fn choices(&self) -> Vec<(String, String)> {
        let blank = || (BLANK_CHOICE.0.to_string(), BLANK_CHOICE.1.to_string());
        match &self.field_type {
            FormFieldType::Choice { choices } => {
                std::iter::once(blank()).chain(choices.iter().cloned()).collect()
            }
            FormFieldType::NullBoolean => vec![
                ("unknown".to_string(), "Unknown".to_string()),
                ("true".to_string(), "Yes".to_string()),
                ("false".to_string(), "No".to_string()),
            ],
            FormFieldType::ModelChoice { .. } => vec![blank()],
            _ => Vec::new(),
        }
    }

    /// Builds the widget instance that renders this field.
    pub fn build_widget(&self) -> Box<dyn Widget> {
        build_widget(self.widget_type, self.choices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_widgets() {
        let cases = [
            (FormFieldType::Char { max_length: None }, WidgetType::TextInput),
            (FormFieldType::Float, WidgetType::NumberInput),
            (FormFieldType::Boolean, WidgetType::CheckboxInput),
            (FormFieldType::NullBoolean, WidgetType::Select),
            (FormFieldType::Date, WidgetType::DateInput),
            (FormFieldType::Email, WidgetType::EmailInput),
            (FormFieldType::Json, WidgetType::Textarea),
            (
                FormFieldType::ModelMultipleChoice { to: "a.b".into() },
                WidgetType::SelectMultiple,
            ),
        ];
        for (field_type, widget) in cases {
            assert_eq!(default_widget_for_field_type(&field_type), widget);
        }
    }

    #[test]
    fn test_builder() {
        let field = FormField::new("first_name", FormFieldType::Char { max_length: Some(30) })
            .label("Given name")
            .required(false)
            .help_text("As printed")
            .widget(WidgetType::Textarea);
        assert_eq!(field.label, "Given name");
        assert!(!field.required);
        assert_eq!(field.help_text, "As printed");
        assert_eq!(field.build_widget().widget_type(), WidgetType::Textarea);
    }

    #[test]
    fn test_choice_field_prepends_blank() {
        let field = FormField::new(
            "status",
            FormFieldType::Choice {
                choices: vec![("d".into(), "Draft".into())],
            },
        );
        assert_eq!(
            field.choices(),
            vec![
                (String::new(), "---------".to_string()),
                ("d".to_string(), "Draft".to_string())
            ]
        );
        let html = field
            .build_widget()
            .render("status", None, &crate::widgets::Attrs::new());
        assert!(html.contains(r#"<option value="d">Draft</option>"#));
    }

    #[test]
    fn test_null_boolean_choices() {
        let field = FormField::new("reviewed", FormFieldType::NullBoolean);
        assert_eq!(field.choices().len(), 3);
        assert_eq!(field.choices()[0].0, "unknown");
    }
}
