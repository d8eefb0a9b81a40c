//! Mapping from model fields to form fields.

use iscore_db::{FieldDef, FieldType};

use crate::fields::{FormField, FormFieldType};
use crate::widgets::WidgetType;

/// Returns the form field a model field produces, or `None` if the field
/// never appears in forms (auto primary keys and non-editable fields).
///
/// Fields with `choices` always become a choice field, whatever their type.
///
/// # Examples
///
/// ```
/// use iscore_db::{FieldDef, FieldType};
/// use iscore_forms::model_form::formfield;
/// use iscore_forms::widgets::WidgetType;
///
/// let pages = formfield(&FieldDef::new("pages", FieldType::PositiveIntegerField)).unwrap();
/// assert_eq!(pages.widget_type, WidgetType::NumberInput);
///
/// assert!(formfield(&FieldDef::new("id", FieldType::AutoField).primary_key()).is_none());
/// ```
pub fn formfield(field: &FieldDef) -> Option<FormField> {
    if field.field_type.is_auto() || !field.editable {
        return None;
    }

    let field_type = match &field.choices {
        Some(choices) => FormFieldType::Choice {
            choices: choices.clone(),
        },
        None => model_field_to_form_field_type(field),
    };

    let mut form_field = FormField::new(field.name.clone(), field_type)
        .label(iscore_core::utils::text::capfirst(&field.verbose_name))
        .required(!field.blank)
        .help_text(field.help_text.clone());
    if field.field_type == FieldType::TextField && field.choices.is_none() {
        form_field = form_field.widget(WidgetType::Textarea);
    }
    Some(form_field)
}

fn model_field_to_form_field_type(field: &FieldDef) -> FormFieldType {
    match &field.field_type {
        FieldType::CharField | FieldType::TextField => FormFieldType::Char {
            max_length: field.max_length,
        },
        FieldType::EmailField => FormFieldType::Email,
        FieldType::UrlField => FormFieldType::Url,
        FieldType::SlugField => FormFieldType::Slug,
        FieldType::IntegerField
        | FieldType::BigIntegerField
        | FieldType::SmallIntegerField
        | FieldType::AutoField
        | FieldType::BigAutoField => FormFieldType::Integer { min_value: None },
        FieldType::PositiveIntegerField => FormFieldType::Integer { min_value: Some(0) },
        FieldType::FloatField => FormFieldType::Float,
        FieldType::DecimalField {
            max_digits,
            decimal_places,
        } => FormFieldType::Decimal {
            max_digits: *max_digits,
            decimal_places: *decimal_places,
        },
        FieldType::BooleanField if field.null => FormFieldType::NullBoolean,
        FieldType::BooleanField => FormFieldType::Boolean,
        FieldType::NullBooleanField => FormFieldType::NullBoolean,
        FieldType::DateField => FormFieldType::Date,
        FieldType::DateTimeField => FormFieldType::DateTime,
        FieldType::TimeField => FormFieldType::Time,
        FieldType::UuidField => FormFieldType::Uuid,
        FieldType::JsonField => FormFieldType::Json,
        FieldType::ForeignKey { to, .. } | FieldType::OneToOneField { to, .. } => {
            FormFieldType::ModelChoice { to: to.clone() }
        }
        FieldType::ManyToManyField { to } => FormFieldType::ModelMultipleChoice { to: to.clone() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iscore_db::OnDelete;

    #[test]
    fn test_text_field_renders_as_textarea() {
        let field = formfield(&FieldDef::new("summary", FieldType::TextField)).unwrap();
        assert_eq!(field.field_type, FormFieldType::Char { max_length: None });
        assert_eq!(field.widget_type, WidgetType::Textarea);
        assert_eq!(field.label, "Summary");
        assert!(field.required);
    }

    #[test]
    fn test_blank_field_not_required() {
        let field = formfield(&FieldDef::new("subtitle", FieldType::CharField).blank()).unwrap();
        assert!(!field.required);
    }

    #[test]
    fn test_non_editable_is_skipped() {
        let field = FieldDef::new("created", FieldType::DateTimeField).not_editable();
        assert!(formfield(&field).is_none());
    }

    #[test]
    fn test_choices_override_type() {
        let field = FieldDef::new("rating", FieldType::IntegerField)
            .choices([("1", "Poor"), ("5", "Great")]);
        let form_field = formfield(&field).unwrap();
        assert_eq!(form_field.widget_type, WidgetType::Select);
        assert_eq!(form_field.choices().len(), 3);
    }

    #[test]
    fn test_relations_map_to_selects() {
        let fk = FieldDef::new(
            "author",
            FieldType::ForeignKey {
                to: "library.author".into(),
                on_delete: OnDelete::Cascade,
            },
        );
        assert_eq!(formfield(&fk).unwrap().widget_type, WidgetType::Select);

        let m2m = FieldDef::new(
            "tags",
            FieldType::ManyToManyField {
                to: "library.tag".into(),
            },
        );
        assert_eq!(
            formfield(&m2m).unwrap().widget_type,
            WidgetType::SelectMultiple
        );
    }

    #[test]
    fn test_widget_per_type() {
        let cases = [
            (FieldType::EmailField, WidgetType::EmailInput),
            (FieldType::UrlField, WidgetType::UrlInput),
            (FieldType::SlugField, WidgetType::TextInput),
            (FieldType::DateField, WidgetType::DateInput),
            (FieldType::DateTimeField, WidgetType::DateTimeInput),
            (FieldType::TimeField, WidgetType::TimeInput),
            (FieldType::BooleanField, WidgetType::CheckboxInput),
            (FieldType::NullBooleanField, WidgetType::Select),
            (FieldType::JsonField, WidgetType::Textarea),
            (
                FieldType::DecimalField {
                    max_digits: 6,
                    decimal_places: 2,
                },
                WidgetType::NumberInput,
            ),
        ];
        for (field_type, widget) in cases {
            let field = formfield(&FieldDef::new("f", field_type)).unwrap();
            assert_eq!(field.widget_type, widget);
        }
    }

    #[test]
    fn test_nullable_boolean_becomes_null_boolean() {
        let field = formfield(&FieldDef::new("reviewed", FieldType::BooleanField).nullable()).unwrap();
        assert_eq!(field.field_type, FormFieldType::NullBoolean);
    }
}
