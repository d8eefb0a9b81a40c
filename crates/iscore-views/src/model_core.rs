//! The model "core": per-model configuration the generic views consult.
//!
//! A [`ModelCore`] answers the questions a list view cannot answer on its own:
//! which columns to show by default, which filter the list starts with, which
//! actions are offered, who may read the list, and which route names belong to
//! the model. [`UiModelCore`] is the builder-configured implementation used by
//! most applications.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use iscore_db::{FieldType, ModelMeta};
use iscore_http::HttpRequest;

/// One configured list column.
///
/// A nested entry shows `name` as its column and carries the names of the
/// related fields the frontend expands it into.
///
/// Serializes like the tuple it replaces: `"title"` or
/// `["author", ["name", "born"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListDisplay {
    /// A plain field path or computed column name.
    Field(String),
    /// A column name with the nested names it expands to.
    Nested(String, Vec<String>),
}

impl ListDisplay {
    /// Returns the name a header is built from.
    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) | Self::Nested(name, _) => name,
        }
    }
}

impl From<&str> for ListDisplay {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for ListDisplay {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

/// The filter a list view starts with.
///
/// Keys are lookups such as `published` or `author__name`; values are the
/// raw query-string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultListFilter {
    /// Lookups rows must match.
    pub filter: BTreeMap<String, String>,
    /// Lookups rows must not match.
    pub exclude: BTreeMap<String, String>,
}

/// An action offered above a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListAction {
    /// Machine name, e.g. `"export"`.
    pub name: String,
    /// Label shown to the user.
    pub verbose_name: String,
    /// How the frontend triggers the action (`"ajax"`, `"link"`, ...).
    pub action_type: String,
    /// Route name the action targets, if any.
    pub url_name: Option<String>,
}

impl ListAction {
    /// Creates an action without a target route.
    pub fn new(
        name: impl Into<String>,
        verbose_name: impl Into<String>,
        action_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            verbose_name: verbose_name.into(),
            action_type: action_type.into(),
            url_name: None,
        }
    }

    /// Sets the route name the action targets.
    #[must_use]
    pub fn url_name(mut self, url_name: impl Into<String>) -> Self {
        self.url_name = Some(url_name.into());
        self
    }
}

/// Per-model configuration consulted by the generic views.
pub trait ModelCore: Send + Sync {
    /// Metadata of the model this core manages.
    fn model(&self) -> Arc<ModelMeta>;

    /// Columns shown when the view does not configure its own.
    fn get_list_display(&self) -> Vec<ListDisplay>;

    /// The filter a list starts with for this request.
    fn get_default_list_filter(&self, request: &HttpRequest) -> DefaultListFilter;

    /// Actions offered above the list for this request.
    fn get_list_actions(&self, request: &HttpRequest) -> Vec<ListAction>;

    /// Whether the requester may read the list.
    fn has_read_permission(&self, request: &HttpRequest) -> bool;

    /// Suffix of this model's route names, and the path segment its list is
    /// served under.
    fn get_menu_group_pattern_name(&self) -> String;

    /// Route name of the API endpoint serving the list rows.
    fn get_api_url_name(&self) -> String;
}

/// Who may read a [`UiModelCore`]'s list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPermission {
    /// Everybody, including anonymous requests.
    Anyone,
    /// Any logged-in user.
    Authenticated,
    /// Staff users only.
    #[default]
    Staff,
}

/// A [`ModelCore`] configured through a builder.
///
/// # Examples
///
/// ```
/// use iscore_db::{FieldDef, FieldType, ModelMeta};
/// use iscore_views::model_core::{ModelCore, ReadPermission, UiModelCore};
///
/// let book = ModelMeta::new("library", "book")
///     .field(FieldDef::new("title", FieldType::CharField).max_length(200));
/// let core = UiModelCore::new(book.into())
///     .list_display(["title"])
///     .default_filter("published", "1")
///     .read_permission(ReadPermission::Anyone);
///
/// assert_eq!(core.get_menu_group_pattern_name(), "book");
/// assert_eq!(core.get_api_url_name(), "api-book");
/// ```
#[derive(Debug, Clone)]
pub struct UiModelCore {
    model: Arc<ModelMeta>,
    menu_group: String,
    api_url_name: Option<String>,
    list_display: Vec<ListDisplay>,
    default_list_filter: DefaultListFilter,
    list_actions: Vec<ListAction>,
    read_permission: ReadPermission,
}

impl UiModelCore {
    /// Creates a core for `model`, grouped under its model name and readable
    /// by staff.
    pub fn new(model: Arc<ModelMeta>) -> Self {
        Self {
            menu_group: model.model_name.clone(),
            model,
            api_url_name: None,
            list_display: Vec::new(),
            default_list_filter: DefaultListFilter::default(),
            list_actions: Vec::new(),
            read_permission: ReadPermission::default(),
        }
    }

    /// Sets the menu group the model's views are served under.
    #[must_use]
    pub fn menu_group(mut self, menu_group: impl Into<String>) -> Self {
        self.menu_group = menu_group.into();
        self
    }

    /// Overrides the API route name (default `api-<menu group>`).
    #[must_use]
    pub fn api_url_name(mut self, name: impl Into<String>) -> Self {
        self.api_url_name = Some(name.into());
        self
    }

    /// Sets the default list columns.
    #[must_use]
    pub fn list_display<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ListDisplay>,
    {
        self.list_display = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a lookup to the default filter.
    #[must_use]
    pub fn default_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_list_filter
            .filter
            .insert(key.into(), value.into());
        self
    }

    /// Adds a lookup to the default exclude.
    #[must_use]
    pub fn default_exclude(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_list_filter
            .exclude
            .insert(key.into(), value.into());
        self
    }

    /// Adds a list action.
    #[must_use]
    pub fn list_action(mut self, action: ListAction) -> Self {
        self.list_actions.push(action);
        self
    }

    /// Sets who may read the list.
    #[must_use]
    pub const fn read_permission(mut self, permission: ReadPermission) -> Self {
        self.read_permission = permission;
        self
    }
}

impl ModelCore for UiModelCore {
    fn model(&self) -> Arc<ModelMeta> {
        Arc::clone(&self.model)
    }

    /// Falls back to every field that fits in a single cell: all of them
    /// except many-to-many relations.
    fn get_list_display(&self) -> Vec<ListDisplay> {
        if !self.list_display.is_empty() {
            return self.list_display.clone();
        }
        self.model
            .fields
            .iter()
            .filter(|f| !matches!(f.field_type, FieldType::ManyToManyField { .. }))
            .map(|f| ListDisplay::Field(f.name.clone()))
            .collect()
    }

    fn get_default_list_filter(&self, _request: &HttpRequest) -> DefaultListFilter {
        self.default_list_filter.clone()
    }

    fn get_list_actions(&self, _request: &HttpRequest) -> Vec<ListAction> {
        self.list_actions.clone()
    }

    fn has_read_permission(&self, request: &HttpRequest) -> bool {
        match self.read_permission {
            ReadPermission::Anyone => true,
            ReadPermission::Authenticated => iscore_auth::is_authenticated(request),
            ReadPermission::Staff => iscore_auth::get_user(request).is_some_and(|u| u.is_staff),
        }
    }

    fn get_menu_group_pattern_name(&self) -> String {
        self.menu_group.clone()
    }

    fn get_api_url_name(&self) -> String {
        self.api_url_name
            .clone()
            .unwrap_or_else(|| format!("api-{}", self.menu_group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iscore_auth::SessionUser;
    use iscore_db::FieldDef;

    fn book() -> Arc<ModelMeta> {
        Arc::new(
            ModelMeta::new("library", "book")
                .field(FieldDef::new("title", FieldType::CharField))
                .field(FieldDef::new(
                    "tags",
                    FieldType::ManyToManyField {
                        to: "library.tag".into(),
                    },
                )),
        )
    }

    fn anonymous() -> HttpRequest {
        HttpRequest::builder().path("/book/").build()
    }

    #[test]
    fn test_list_display_serializes_like_tuples() {
        let columns = vec![
            ListDisplay::from("title"),
            ListDisplay::Nested("author".into(), vec!["name".into()]),
        ];
        assert_eq!(
            serde_json::to_value(&columns).unwrap(),
            serde_json::json!(["title", ["author", ["name"]]])
        );
        assert_eq!(columns[1].name(), "author");
    }

    #[test]
    fn test_default_list_display_skips_many_to_many() {
        let core = UiModelCore::new(book());
        assert_eq!(
            core.get_list_display(),
            vec![ListDisplay::from("id"), ListDisplay::from("title")]
        );
    }

    #[test]
    fn test_configured_list_display_wins() {
        let core = UiModelCore::new(book()).list_display(["title"]);
        assert_eq!(core.get_list_display(), vec![ListDisplay::from("title")]);
    }

    #[test]
    fn test_route_names() {
        let core = UiModelCore::new(book()).menu_group("books");
        assert_eq!(core.get_menu_group_pattern_name(), "books");
        assert_eq!(core.get_api_url_name(), "api-books");

        let core = core.api_url_name("rest-books");
        assert_eq!(core.get_api_url_name(), "rest-books");
    }

    #[test]
    fn test_default_filter_and_actions() {
        let core = UiModelCore::new(book())
            .default_filter("published", "1")
            .default_exclude("title", "")
            .list_action(ListAction::new("export", "Export", "ajax").url_name("export-books"));
        let filter = core.get_default_list_filter(&anonymous());
        assert_eq!(filter.filter.get("published").map(String::as_str), Some("1"));
        assert_eq!(filter.exclude.get("title").map(String::as_str), Some(""));
        let actions = core.get_list_actions(&anonymous());
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].url_name.as_deref(), Some("export-books"));
    }

    #[test]
    fn test_read_permission_levels() {
        let anonymous = anonymous();
        let member = HttpRequest::builder().build();
        iscore_auth::login(&member, &SessionUser::new("alice"));
        let staff = HttpRequest::builder().build();
        iscore_auth::login(&staff, &SessionUser::new("root").staff());

        let anyone = UiModelCore::new(book()).read_permission(ReadPermission::Anyone);
        assert!(anyone.has_read_permission(&anonymous));

        let authenticated = UiModelCore::new(book()).read_permission(ReadPermission::Authenticated);
        assert!(!authenticated.has_read_permission(&anonymous));
        assert!(authenticated.has_read_permission(&member));

        let staff_only = UiModelCore::new(book());
        assert!(!staff_only.has_read_permission(&member));
        assert!(staff_only.has_read_permission(&staff));
    }
}
