//! Widget system for rendering HTML form elements.
//!
//! A widget turns a field name, an optional current value and a set of extra
//! attributes into an HTML fragment. The list views use them to render the
//! per-column filter inputs.

use std::collections::BTreeMap;
use std::fmt;

use iscore_core::utils::text::escape_html;
use iscore_http::QueryDict;

/// HTML attributes passed to [`Widget::render`]. Ordered, so output is stable.
pub type Attrs = BTreeMap<String, String>;

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="url">`.
    UrlInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<select multiple>`.
    SelectMultiple,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
    /// `<input type="time">`.
    TimeInput,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::UrlInput => "UrlInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
            Self::TimeInput => "TimeInput",
        };
        write!(f, "{name}")
    }
}

/// A trait for HTML form widgets.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget as HTML.
    ///
    /// `name`, `value` and every attribute value are HTML-escaped.
    fn render(&self, name: &str, value: Option<&str>, attrs: &Attrs) -> String;

    /// Extracts the submitted value for `name`, if any.
    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<String> {
        data.get(name).map(String::from)
    }
}

/// Formats attributes as ` key="value"` pairs in key order.
fn render_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {}="{}""#, escape_html(k), escape_html(v)))
        .collect()
}

fn render_input(input_type: &str, name: &str, value: Option<&str>, attrs: &Attrs) -> String {
    format!(
        r#"<input type="{input_type}" name="{}" value="{}"{} />"#,
        escape_html(name),
        escape_html(value.unwrap_or("")),
        render_attrs(attrs)
    )
}

fn render_options(choices: &[(String, String)], is_selected: impl Fn(&str) -> bool) -> String {
    choices
        .iter()
        .map(|(val, label)| {
            let selected = if is_selected(val) { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(val),
                escape_html(label)
            )
        })
        .collect()
}

macro_rules! input_widget {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $input_type:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Widget for $name {
            fn widget_type(&self) -> WidgetType {
                WidgetType::$kind
            }

            fn render(&self, name: &str, value: Option<&str>, attrs: &Attrs) -> String {
                render_input($input_type, name, value, attrs)
            }
        }
    };
}

input_widget!(
    /// A basic `<input type="text">` widget.
    TextInput, TextInput, "text"
);
input_widget!(
    /// An `<input type="number">` widget.
    NumberInput, NumberInput, "number"
);
input_widget!(
    /// An `<input type="email">` widget.
    EmailInput, EmailInput, "email"
);
input_widget!(
    /// An `<input type="url">` widget.
    UrlInput, UrlInput, "url"
);
input_widget!(
    /// An `<input type="hidden">` widget.
    HiddenInput, HiddenInput, "hidden"
);
input_widget!(
    /// An `<input type="date">` widget.
    DateInput, DateInput, "date"
);
input_widget!(
    /// An `<input type="datetime-local">` widget.
    DateTimeInput, DateTimeInput, "datetime-local"
);
input_widget!(
    /// An `<input type="time">` widget.
    TimeInput, TimeInput, "time"
);

/// A `<textarea>` widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &Attrs) -> String {
        format!(
            r#"<textarea name="{}"{}>{}</textarea>"#,
            escape_html(name),
            render_attrs(attrs),
            escape_html(value.unwrap_or(""))
        )
    }
}

/// An `<input type="checkbox">` widget.
///
/// Checked when the value is one of `"true"`, `"on"` or `"1"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &Attrs) -> String {
        let checked = if matches!(value, Some("true" | "on" | "1")) {
            " checked"
        } else {
            ""
        };
        format!(
            r#"<input type="checkbox" name="{}"{checked}{} />"#,
            escape_html(name),
            render_attrs(attrs)
        )
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<String> {
        Some(data.contains_key(name).to_string())
    }
}

/// A `<select>` widget.
///
/// ```
/// use iscore_forms::widgets::{Attrs, Select, Widget};
///
/// let select = Select::new(vec![("1".into(), "Yes".into()), ("0".into(), "No".into())]);
/// let html = select.render("active", Some("0"), &Attrs::new());
/// assert_eq!(
///     html,
///     r#"<select name="active"><option value="1">Yes</option><option value="0" selected>No</option></select>"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    /// The available choices as `(value, label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl Select {
    /// Creates a new `Select` widget with the given choices.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &Attrs) -> String {
        let current = value.unwrap_or("");
        format!(
            r#"<select name="{}"{}>{}</select>"#,
            escape_html(name),
            render_attrs(attrs),
            render_options(&self.choices, |v| v == current)
        )
    }
}

/// A `<select multiple>` widget. The value is a comma-separated list.
#[derive(Debug, Clone, Default)]
pub struct SelectMultiple {
    /// The available choices as `(value, label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl SelectMultiple {
    /// Creates a new `SelectMultiple` widget with the given choices.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for SelectMultiple {
    fn widget_type(&self) -> WidgetType {
        WidgetType::SelectMultiple
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &Attrs) -> String {
        let selected: Vec<&str> = value.map_or_else(Vec::new, |v| v.split(',').collect());
        format!(
            r#"<select name="{}" multiple{}>{}</select>"#,
            escape_html(name),
            render_attrs(attrs),
            render_options(&self.choices, |v| selected.contains(&v))
        )
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<String> {
        data.get_list(name).map(|vals| vals.join(","))
    }
}

/// Instantiates the widget for a [`WidgetType`].
///
/// `choices` is only used by the select widgets.
pub fn build_widget(widget_type: WidgetType, choices: Vec<(String, String)>) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::TextInput => Box::new(TextInput),
        WidgetType::NumberInput => Box::new(NumberInput),
        WidgetType::EmailInput => Box::new(EmailInput),
        WidgetType::UrlInput => Box::new(UrlInput),
        WidgetType::HiddenInput => Box::new(HiddenInput),
        WidgetType::Textarea => Box::new(Textarea),
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        WidgetType::Select => Box::new(Select::new(choices)),
        WidgetType::SelectMultiple => Box::new(SelectMultiple::new(choices)),
        WidgetType::DateInput => Box::new(DateInput),
        WidgetType::DateTimeInput => Box::new(DateTimeInput),
        WidgetType::TimeInput => Box::new(TimeInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_text_input_render() {
        let html = TextInput.render(
            "filter__title",
            None,
            &attrs(&[("data-filter", "title__contains"), ("class", "filter")]),
        );
        assert_eq!(
            html,
            r#"<input type="text" name="filter__title" value="" class="filter" data-filter="title__contains" />"#
        );
    }

    #[test]
    fn test_input_escapes_value_and_attrs() {
        let html = TextInput.render("q", Some(r#""><script>"#), &attrs(&[("title", "a&b")]));
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
        assert!(html.contains(r#"title="a&amp;b""#));
    }

    #[test]
    fn test_input_types() {
        let empty = Attrs::new();
        assert!(NumberInput.render("n", Some("3"), &empty).contains(r#"type="number""#));
        assert!(EmailInput.render("e", None, &empty).contains(r#"type="email""#));
        assert!(UrlInput.render("u", None, &empty).contains(r#"type="url""#));
        assert!(HiddenInput.render("h", None, &empty).contains(r#"type="hidden""#));
        assert!(DateInput.render("d", None, &empty).contains(r#"type="date""#));
        assert!(DateTimeInput
            .render("dt", None, &empty)
            .contains(r#"type="datetime-local""#));
        assert!(TimeInput.render("t", None, &empty).contains(r#"type="time""#));
    }

    #[test]
    fn test_textarea_render() {
        let html = Textarea.render("bio", Some("<b>"), &attrs(&[("rows", "3")]));
        assert_eq!(html, r#"<textarea name="bio" rows="3">&lt;b&gt;</textarea>"#);
    }

    #[test]
    fn test_checkbox() {
        let empty = Attrs::new();
        assert!(CheckboxInput.render("a", Some("on"), &empty).contains(" checked"));
        assert!(!CheckboxInput.render("a", Some("no"), &empty).contains(" checked"));

        let data = QueryDict::parse("a=on");
        assert_eq!(CheckboxInput.value_from_data(&data, "a").as_deref(), Some("true"));
        assert_eq!(CheckboxInput.value_from_data(&data, "b").as_deref(), Some("false"));
    }

    #[test]
    fn test_select_escapes_labels() {
        let select = Select::new(vec![("a&b".into(), "<A>".into())]);
        let html = select.render("x", None, &Attrs::new());
        assert_eq!(
            html,
            r#"<select name="x"><option value="a&amp;b">&lt;A&gt;</option></select>"#
        );
    }

    #[test]
    fn test_select_multiple() {
        let widget = SelectMultiple::new(vec![
            ("1".into(), "One".into()),
            ("2".into(), "Two".into()),
            ("3".into(), "Three".into()),
        ]);
        let html = widget.render("tags", Some("1,3"), &Attrs::new());
        assert!(html.starts_with(r#"<select name="tags" multiple>"#));
        assert!(html.contains(r#"<option value="1" selected>"#));
        assert!(html.contains(r#"<option value="2">"#));
        assert!(html.contains(r#"<option value="3" selected>"#));

        let data = QueryDict::parse("tags=1&tags=3");
        assert_eq!(widget.value_from_data(&data, "tags").as_deref(), Some("1,3"));
    }

    #[test]
    fn test_build_widget_matches_type() {
        for widget_type in [
            WidgetType::TextInput,
            WidgetType::NumberInput,
            WidgetType::Textarea,
            WidgetType::Select,
            WidgetType::SelectMultiple,
            WidgetType::TimeInput,
        ] {
            assert_eq!(build_widget(widget_type, Vec::new()).widget_type(), widget_type);
        }
    }

    #[test]
    fn test_widget_type_display() {
        assert_eq!(WidgetType::DateTimeInput.to_string(), "DateTimeInput");
    }
}
