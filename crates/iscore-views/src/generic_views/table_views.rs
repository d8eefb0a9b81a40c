//! The list/table view.
//!
//! [`TableView`] renders `generic_views/table.html`: one [`Header`] per list
//! column, each with the [`Filter`] input the frontend places under it, plus
//! the route names and default filter the frontend needs to load rows.
//!
//! Column names may walk through relations with the lookup separator, e.g.
//! `author__name` on a book is the `name` field of the book's author.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use iscore_core::{IsCoreError, IsCoreResult};
use iscore_db::{FieldDef, FieldType, ModelMeta, ModelRegistry, LOOKUP_SEP};
use iscore_forms::widgets::{Attrs, Select, TextInput, Widget};
use iscore_http::{HttpRequest, HttpResponse};
use iscore_template::Engine;

use crate::generic_views::core_view::DefaultCoreViewMixin;
use crate::model_core::ListDisplay;
use crate::utils::query_string_from_dict;
use crate::views::class_based::{Context, ContextMixin, TemplateResponseMixin, View};

/// Suffix appended to exclude lookups in the filter query string.
const EXCLUDE_SUFFIX: &str = "__not";

/// A column header of a table view.
///
/// Displays as its text.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    /// The full column path, e.g. `author__name`.
    pub field_name: String,
    /// The label shown in the header cell.
    pub text: String,
    /// Whether the column can be sorted on.
    pub sortable: bool,
    /// The filter input for this column. Computed columns have none.
    pub filter: Option<Filter>,
}

impl Header {
    /// Creates a header.
    pub fn new(
        field_name: impl Into<String>,
        text: impl Into<String>,
        sortable: bool,
        filter: Option<Filter>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            text: text.into(),
            sortable,
            filter,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The filter input under a column header.
///
/// Displays as the rendered widget HTML. Serializes as
/// `{field_name, filter_name, html}` so templates can place the markup.
#[derive(Debug, Clone)]
pub struct Filter {
    field_name: String,
    field: FieldDef,
}

impl Filter {
    /// Creates the filter for the column `field_name`, whose terminal field
    /// is `field`.
    pub fn new(field_name: impl Into<String>, field: FieldDef) -> Self {
        Self {
            field_name: field_name.into(),
            field,
        }
    }

    /// Returns the column path.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the terminal field.
    pub const fn field(&self) -> &FieldDef {
        &self.field
    }

    /// Returns the lookup the filter value is applied with.
    ///
    /// Text fields are matched by substring, everything else exactly.
    pub fn get_filter_name(&self) -> String {
        match self.field.field_type {
            FieldType::CharField
            | FieldType::TextField
            | FieldType::EmailField
            | FieldType::UrlField
            | FieldType::SlugField => format!("{}__contains", self.field_name),
            _ => self.field_name.clone(),
        }
    }

    /// Returns the input widget for the filter.
    pub fn get_widget(&self) -> Box<dyn Widget> {
        match self.field.field_type {
            FieldType::BooleanField => Box::new(Select::new(vec![
                (String::new(), "-----".to_string()),
                ("1".to_string(), "Yes".to_string()),
                ("0".to_string(), "No".to_string()),
            ])),
            // A textarea would not fit in a header cell.
            FieldType::TextField => Box::new(TextInput),
            _ => iscore_forms::formfield(&self.field)
                .map_or_else(|| Box::new(TextInput) as Box<dyn Widget>, |f| f.build_widget()),
        }
    }

    /// Renders the widget named `filter__<column path>`.
    pub fn render(&self) -> String {
        let mut attrs = Attrs::new();
        attrs.insert("data-filter".to_string(), self.get_filter_name());
        self.get_widget()
            .render(&format!("filter__{}", self.field_name), None, &attrs)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Filter", 3)?;
        state.serialize_field("field_name", &self.field_name)?;
        state.serialize_field("filter_name", &self.get_filter_name())?;
        state.serialize_field("html", &self.render())?;
        state.end()
    }
}

/// Lists the rows of a core's model.
///
/// GET requires read permission on the core; without it the view answers
/// 403. The rows themselves are fetched by the frontend from the API route
/// named in the context.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use iscore_db::{FieldDef, FieldType, ModelMeta, ModelRegistry};
/// use iscore_template::Engine;
/// use iscore_views::generic_views::{DefaultCoreViewMixin, TableView};
/// use iscore_views::model_core::UiModelCore;
///
/// let mut registry = ModelRegistry::new();
/// let book = registry
///     .register(ModelMeta::new("library", "book")
///         .field(FieldDef::new("title", FieldType::CharField)))
///     .unwrap();
/// let mixin = DefaultCoreViewMixin::new(Arc::new(UiModelCore::new(book)), "iscore");
/// let view = TableView::new(mixin, Arc::new(registry), Arc::new(Engine::new()));
///
/// let header = view.get_header("title").unwrap();
/// assert!(header.sortable);
/// assert_eq!(header.filter.unwrap().get_filter_name(), "title__contains");
/// ```
pub struct TableView {
    mixin: DefaultCoreViewMixin,
    registry: Arc<ModelRegistry>,
    engine: Arc<Engine>,
    list_display: Vec<ListDisplay>,
    template_name: String,
}

impl TableView {
    /// The `view_type` context value.
    pub const VIEW_TYPE: &'static str = "list";

    /// Creates a table view rendering `generic_views/table.html`.
    pub fn new(
        mixin: DefaultCoreViewMixin,
        registry: Arc<ModelRegistry>,
        engine: Arc<Engine>,
    ) -> Self {
        Self {
            mixin,
            registry,
            engine,
            list_display: Vec::new(),
            template_name: "generic_views/table.html".to_string(),
        }
    }

    /// Sets the view's own columns, used instead of the core's.
    #[must_use]
    pub fn list_display<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ListDisplay>,
    {
        self.list_display = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Renders a different template.
    #[must_use]
    pub fn template(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = template_name.into();
        self
    }

    /// Returns the page title.
    pub fn get_title(&self) -> String {
        format!("List {}", self.mixin.get_model().verbose_name_plural)
    }

    /// Returns the columns: the view's own if set, otherwise the core's.
    pub fn get_list_display(&self) -> Vec<ListDisplay> {
        if self.list_display.is_empty() {
            self.mixin.core().get_list_display()
        } else {
            self.list_display.clone()
        }
    }

    /// Builds the header for the column `full_field_name`.
    ///
    /// A terminal model field gives a sortable header labelled with the
    /// field's verbose name, with a filter. A computed column gives an
    /// unsortable header labelled with its short description, without a
    /// filter. Anything else is `FieldDoesNotExist`.
    pub fn get_header(&self, full_field_name: &str) -> IsCoreResult<Header> {
        self.resolve_header(full_field_name, full_field_name, self.mixin.get_model())
    }

    fn resolve_header(
        &self,
        full_field_name: &str,
        field_name: &str,
        model: &ModelMeta,
    ) -> IsCoreResult<Header> {
        if let Some((current, rest)) = field_name.split_once(LOOKUP_SEP) {
            let field = model.get_field(current)?;
            if !field.is_relation() {
                return Err(IsCoreError::FieldDoesNotExist {
                    model: model.model_key(),
                    field: field_name.to_string(),
                });
            }
            let related = self.registry.related_model(field)?;
            tracing::debug!(
                column = full_field_name,
                relation = current,
                target = %related.model_key(),
                "following relation"
            );
            return self.resolve_header(full_field_name, rest, &related);
        }

        if let Ok(field) = model.get_field(field_name) {
            return Ok(Header::new(
                full_field_name,
                field.verbose_name.clone(),
                true,
                Some(Filter::new(full_field_name, field.clone())),
            ));
        }
        model.get_computed(field_name).map_or_else(
            || {
                Err(IsCoreError::FieldDoesNotExist {
                    model: model.model_key(),
                    field: field_name.to_string(),
                })
            },
            |column| {
                Ok(Header::new(
                    full_field_name,
                    column.short_description.clone(),
                    false,
                    None,
                ))
            },
        )
    }

    /// Builds one header per column.
    pub fn get_headers(&self) -> IsCoreResult<Vec<Header>> {
        self.get_list_display()
            .iter()
            .map(|column| self.get_header(column.name()))
            .collect()
    }

    /// Returns the core's default filter as a query string. Exclude lookups
    /// get the `__not` suffix.
    pub fn get_query_string_filter(&self, request: &HttpRequest) -> String {
        let default_list_filter = self.mixin.core().get_default_list_filter(request);
        let mut filter_vals = default_list_filter.filter;
        for (key, val) in default_list_filter.exclude {
            filter_vals.insert(format!("{key}{EXCLUDE_SUFFIX}"), val);
        }
        query_string_from_dict(&filter_vals)
    }

    /// Whether `request` may GET this view.
    pub fn has_get_permission(&self, request: &HttpRequest) -> bool {
        self.mixin.core().has_read_permission(request)
    }
}

impl fmt::Debug for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("mixin", &self.mixin)
            .field("list_display", &self.list_display)
            .field("template_name", &self.template_name)
            .finish_non_exhaustive()
    }
}

impl ContextMixin for TableView {
    fn get_context_data(&self, request: &HttpRequest) -> IsCoreResult<Context> {
        let mut context = self.mixin.get_context_data(request)?;
        let core = self.mixin.core();
        let model = self.mixin.get_model();
        let site_name = self.mixin.site_name();
        let pattern_name = core.get_menu_group_pattern_name();

        context.insert("title".into(), self.get_title().into());
        context.insert("headers".into(), serde_json::to_value(self.get_headers()?)?);
        context.insert("api_url_name".into(), core.get_api_url_name().into());
        context.insert(
            "add_url_name".into(),
            format!("{site_name}:add-{pattern_name}").into(),
        );
        context.insert(
            "edit_url_name".into(),
            format!("{site_name}:edit-{pattern_name}").into(),
        );
        context.insert("module_name".into(), model.model_name.clone().into());
        context.insert("verbose_name".into(), model.verbose_name.clone().into());
        context.insert("view_type".into(), Self::VIEW_TYPE.into());
        context.insert(
            "list_display".into(),
            serde_json::to_value(self.get_list_display())?,
        );
        context.insert(
            "list_action".into(),
            serde_json::to_value(core.get_list_actions(request))?,
        );
        context.insert(
            "query_string_filter".into(),
            self.get_query_string_filter(request).into(),
        );
        context.insert("menu_group_pattern_name".into(), pattern_name.into());
        Ok(context)
    }
}

impl TemplateResponseMixin for TableView {
    fn template_name(&self) -> &str {
        &self.template_name
    }

    fn engine(&self) -> &Engine {
        &self.engine
    }
}

#[async_trait]
impl View for TableView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        let model = self.mixin.get_model();
        if !self.has_get_permission(&request) {
            tracing::warn!(model = %model.model_key(), path = %request.path(), "read permission denied");
            return HttpResponse::from_error(&IsCoreError::PermissionDenied(format!(
                "you may not list {}",
                model.verbose_name_plural
            )));
        }
        match self.get_context_data(&request) {
            Ok(context) => self.render_to_response(context),
            Err(e) => {
                tracing::error!(model = %model.model_key(), error = %e, "failed to build list context");
                HttpResponse::from_error(&e)
            }
        }
    }
}
