//! # iscore-template
//!
//! Template rendering for iscore, backed by [`tera`].
//!
//! The [`Engine`] ships with the templates the generic views render:
//!
//! | name | used by |
//! |---|---|
//! | `iscore/base.html` | layout extended by the others |
//! | `generic_views/table.html` | `TableView` |
//! | `registration/logout.html` | `LogoutView` |
//!
//! Any of them can be replaced by a file with the same relative name in one
//! of the configured template directories.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use iscore_core::{IsCoreError, IsCoreResult, Settings};

const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("iscore/base.html", include_str!("builtin/base.html")),
    ("generic_views/table.html", include_str!("builtin/table.html")),
    ("registration/logout.html", include_str!("builtin/logout.html")),
];

/// The template engine.
///
/// Rendering takes a shared lock, adding templates an exclusive one, so the
/// engine can sit behind an `Arc` and be shared by every view.
///
/// # Examples
///
/// ```
/// use iscore_template::Engine;
///
/// let engine = Engine::new();
/// engine.add_string_template("hello.html", "Hello {{ name }}!").unwrap();
///
/// let html = engine.render("hello.html", &serde_json::json!({"name": "<World>"})).unwrap();
/// assert_eq!(html, "Hello &lt;World&gt;!");
/// ```
#[derive(Debug)]
pub struct Engine {
    tera: RwLock<tera::Tera>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine holding only the built-in templates.
    pub fn new() -> Self {
        let mut tera = tera::Tera::default();
        // Built-ins are compiled into the binary and covered by tests.
        if let Err(e) = tera.add_raw_templates(BUILTIN_TEMPLATES) {
            tracing::error!(error = %describe(&e), "built-in templates failed to parse");
        }
        Self {
            tera: RwLock::new(tera),
        }
    }

    /// Creates an engine with the built-in templates, overridden or extended
    /// by every `*.html` file found under `dirs`.
    ///
    /// Templates are named by their path relative to the directory they were
    /// found in. Earlier directories take precedence over later ones.
    pub fn from_dirs(dirs: &[PathBuf]) -> IsCoreResult<Self> {
        let engine = Self::new();
        let mut found: Vec<(String, String)> = Vec::new();
        for dir in dirs.iter().rev() {
            if !dir.is_dir() {
                tracing::warn!(dir = %dir.display(), "template directory does not exist");
                continue;
            }
            collect_templates(dir, dir, &mut found)?;
        }
        if !found.is_empty() {
            tracing::debug!(count = found.len(), "loaded templates from disk");
            engine
                .write()
                .add_raw_templates(found)
                .map_err(|e| IsCoreError::TemplateError(describe(&e)))?;
        }
        Ok(engine)
    }

    /// Creates an engine from the `template_dirs` setting.
    pub fn from_settings(settings: &Settings) -> IsCoreResult<Self> {
        Self::from_dirs(&settings.template_dirs)
    }

    /// Adds (or replaces) a template from a string.
    pub fn add_string_template(&self, name: &str, source: &str) -> IsCoreResult<()> {
        self.write()
            .add_raw_template(name, source)
            .map_err(|e| IsCoreError::TemplateError(describe(&e)))
    }

    /// Returns `true` if a template with this name is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.read().get_template_names().any(|n| n == name)
    }

    /// Renders a template with a JSON object as its context.
    ///
    /// `.html` templates are auto-escaped.
    pub fn render(&self, name: &str, context: &serde_json::Value) -> IsCoreResult<String> {
        let context = tera::Context::from_value(context.clone())
            .map_err(|e| IsCoreError::TemplateError(describe(&e)))?;
        self.read().render(name, &context).map_err(|e| {
            if matches!(e.kind, tera::ErrorKind::TemplateNotFound(_)) {
                IsCoreError::TemplateDoesNotExist(name.to_string())
            } else {
                IsCoreError::TemplateError(describe(&e))
            }
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, tera::Tera> {
        self.tera.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, tera::Tera> {
        self.tera.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Flattens a tera error and its causes into one line.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn collect_templates(
    root: &Path,
    dir: &Path,
    found: &mut Vec<(String, String)>,
) -> IsCoreResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_templates(root, &path, found)?;
        } else if path.extension().and_then(std::ffi::OsStr::to_str) == Some("html") {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let source = std::fs::read_to_string(&path)?;
            found.retain(|(existing, _)| existing != &name);
            found.push((name, source));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_loaded() {
        let engine = Engine::new();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(engine.has_template(name), "{name} missing");
        }
    }

    #[test]
    fn test_missing_template() {
        let engine = Engine::new();
        let err = engine
            .render("nope.html", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, IsCoreError::TemplateDoesNotExist(ref n) if n == "nope.html"));
    }

    #[test]
    fn test_context_must_be_object() {
        let engine = Engine::new();
        let err = engine
            .render("registration/logout.html", &serde_json::json!([1, 2]))
            .unwrap_err();
        assert!(matches!(err, IsCoreError::TemplateError(_)));
    }

    #[test]
    fn test_bad_string_template() {
        let engine = Engine::new();
        let err = engine
            .add_string_template("broken.html", "{% if %}")
            .unwrap_err();
        assert!(matches!(err, IsCoreError::TemplateError(_)));
    }

    #[test]
    fn test_logout_template_renders() {
        let engine = Engine::new();
        let html = engine
            .render(
                "registration/logout.html",
                &serde_json::json!({"site_name": "backoffice", "login_url": "/login/"}),
            )
            .unwrap();
        assert!(html.contains("<title>Logged out</title>"));
        assert!(html.contains(r#"href="&#x2F;login&#x2F;""#));
    }

    #[test]
    fn test_logout_template_escapes_login_url() {
        let engine = Engine::new();
        let html = engine
            .render(
                "registration/logout.html",
                &serde_json::json!({"login_url": r#"/login/" onclick="steal()"#}),
            )
            .unwrap();
        assert!(!html.contains(r#"" onclick=""#));
        assert!(html.contains("&quot; onclick=&quot;steal()"));
    }

    #[test]
    fn test_table_template_renders_filter_html_unescaped() {
        let engine = Engine::new();
        let html = engine
            .render(
                "generic_views/table.html",
                &serde_json::json!({
                    "title": "List books",
                    "headers": [
                        {"field_name": "title", "text": "title", "sortable": true,
                         "filter": {"html": "<input name=\"filter__title\" />"}},
                        {"field_name": "age", "text": "Age", "sortable": false, "filter": null}
                    ],
                    "list_action": [{"name": "export", "verbose_name": "Export",
                                     "action_type": "ajax", "url_name": null}],
                    "menu_groups": ["books"],
                    "view_type": "list",
                    "module_name": "book",
                    "api_url_name": "api-books",
                    "add_url_name": "iscore:add-books",
                    "edit_url_name": "iscore:edit-books",
                    "menu_group_pattern_name": "books",
                    "query_string_filter": "",
                }),
            )
            .unwrap();
        assert!(html.contains("<title>List books</title>"));
        assert!(html.contains(r#"<th data-field="title" class="sortable">title</th>"#));
        assert!(html.contains(r#"<th data-field="age">Age</th>"#));
        assert!(html.contains(r#"<input name="filter__title" />"#));
        assert!(html.contains(r#"<a href="/books/">books</a>"#));
        assert!(html.contains(r#"<li data-action="export" data-type="ajax">Export</li>"#));
        assert!(html.contains(r#"data-add-url-name="iscore:add-books""#));
    }

    #[test]
    fn test_logout_template_without_optional_keys() {
        let engine = Engine::new();
        let html = engine
            .render("registration/logout.html", &serde_json::json!({}))
            .unwrap();
        assert!(html.contains("Logged out"));
        assert!(!html.contains("<nav"));
    }
}
