//! The iscore site: registered cores served through an axum router.
//!
//! | route | view |
//! |---|---|
//! | `/logout/` | [`LogoutView`] |
//! | `/<menu group>/` | [`TableView`] of the core registered under that group |
//!
//! Every request gets a tracing span and runs inside the session layer.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use axum::Router;
use tracing::Instrument;

use iscore_core::logging::request_span;
use iscore_core::{IsCoreError, IsCoreResult, Settings};
use iscore_db::ModelRegistry;
use iscore_http::HttpRequest;
use iscore_template::Engine;

use crate::generic_views::{DefaultCoreViewMixin, LogoutView, TableView};
use crate::model_core::ModelCore;
use crate::session::{InMemorySessionBackend, SessionBackend, SessionLayer};
use crate::views::class_based::{View, ViewFunction};

/// Path segments that cannot be used as menu groups.
const RESERVED_GROUPS: [&str; 1] = ["logout"];

/// A set of model cores and the views serving them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use iscore_core::Settings;
/// use iscore_db::{FieldDef, FieldType, ModelMeta, ModelRegistry};
/// use iscore_template::Engine;
/// use iscore_views::model_core::UiModelCore;
/// use iscore_views::site::IsCoreSite;
///
/// let mut registry = ModelRegistry::new();
/// let book = registry
///     .register(ModelMeta::new("library", "book")
///         .field(FieldDef::new("title", FieldType::CharField)))
///     .unwrap();
///
/// let mut site = IsCoreSite::new(Settings::default(), registry, Engine::new());
/// site.register(Arc::new(UiModelCore::new(book))).unwrap();
/// assert_eq!(site.menu_groups(), vec!["book".to_string()]);
///
/// let router: axum::Router = site.into_axum_router();
/// ```
pub struct IsCoreSite {
    settings: Settings,
    registry: Arc<ModelRegistry>,
    engine: Arc<Engine>,
    cores: Vec<Arc<dyn ModelCore>>,
    session_layer: SessionLayer,
    extra_views: Vec<(String, ViewFunction)>,
}

impl IsCoreSite {
    /// Creates a site with an in-memory session store.
    pub fn new(settings: Settings, registry: ModelRegistry, engine: Engine) -> Self {
        let backend: Arc<dyn SessionBackend> = Arc::new(InMemorySessionBackend::new());
        Self {
            session_layer: SessionLayer::from_settings(&settings, backend),
            settings,
            registry: Arc::new(registry),
            engine: Arc::new(engine),
            cores: Vec::new(),
            extra_views: Vec::new(),
        }
    }

    /// Stores sessions in `backend`.
    #[must_use]
    pub fn session_backend(mut self, backend: Arc<dyn SessionBackend>) -> Self {
        self.session_layer = SessionLayer::from_settings(&self.settings, backend);
        self
    }

    /// Serves `view` at `path`, inside the session layer like the site's own
    /// views.
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, view: impl View + 'static) -> Self {
        self.extra_views.push((path.into(), view.as_view()));
        self
    }

    /// Registers a core. Its list is served under its menu group.
    ///
    /// Fails with `ImproperlyConfigured` if the core's model is not in the
    /// registry, or its menu group is taken.
    pub fn register(&mut self, core: Arc<dyn ModelCore>) -> IsCoreResult<()> {
        let model_key = core.model().model_key();
        if !self.registry.contains(&model_key) {
            return Err(IsCoreError::ImproperlyConfigured(format!(
                "model '{model_key}' is not registered"
            )));
        }
        let group = core.get_menu_group_pattern_name();
        if RESERVED_GROUPS.contains(&group.as_str())
            || self
                .cores
                .iter()
                .any(|c| c.get_menu_group_pattern_name() == group)
        {
            return Err(IsCoreError::ImproperlyConfigured(format!(
                "menu group '{group}' is already in use"
            )));
        }
        tracing::debug!(model = %model_key, menu_group = %group, "registered core");
        self.cores.push(core);
        Ok(())
    }

    /// Returns the site name.
    pub fn name(&self) -> &str {
        &self.settings.site_name
    }

    /// Returns the menu groups of the registered cores, in registration order.
    pub fn menu_groups(&self) -> Vec<String> {
        self.cores
            .iter()
            .map(|c| c.get_menu_group_pattern_name())
            .collect()
    }

    /// Returns the session layer.
    pub const fn session_layer(&self) -> &SessionLayer {
        &self.session_layer
    }

    /// Builds the table view for `core`.
    pub fn table_view(&self, core: Arc<dyn ModelCore>) -> TableView {
        let mixin = DefaultCoreViewMixin::new(core, self.name()).menu_groups(self.menu_groups());
        TableView::new(mixin, Arc::clone(&self.registry), Arc::clone(&self.engine))
    }

    /// Builds the logout view.
    pub fn logout_view(&self) -> LogoutView {
        LogoutView::new(Arc::clone(&self.engine))
            .login_url(&self.settings.login_url)
            .site_name(self.name())
    }

    /// Converts the site into an axum router.
    pub fn into_axum_router(self) -> Router {
        let layer = Arc::new(self.session_layer.clone());
        let mut router =
            Router::new().route("/logout/", serve(self.logout_view().as_view(), &layer));
        for core in &self.cores {
            let path = format!("/{}/", core.get_menu_group_pattern_name());
            let view = self.table_view(Arc::clone(core)).as_view();
            router = router.route(&path, serve(view, &layer));
        }
        for (path, view) in self.extra_views {
            router = router.route(&path, serve(view, &layer));
        }
        router
    }
}

impl std::fmt::Debug for IsCoreSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsCoreSite")
            .field("name", &self.settings.site_name)
            .field("menu_groups", &self.menu_groups().join(", "))
            .field("extra_routes", &self.extra_views.len())
            .finish_non_exhaustive()
    }
}

fn serve(view: ViewFunction, layer: &Arc<SessionLayer>) -> MethodRouter {
    let layer = Arc::clone(layer);
    any(move |req: Request<Body>| {
        let view = Arc::clone(&view);
        let layer = Arc::clone(&layer);
        async move { handle(view, &layer, req).await }
    })
}

async fn handle(view: ViewFunction, layer: &SessionLayer, req: Request<Body>) -> Response {
    let (parts, _body) = req.into_parts();
    let mut request = HttpRequest::from_axum(parts);
    let span = request_span(request.method().as_str(), request.path());

    async move {
        layer.load(&mut request).await;
        let session = request.session().clone();
        let sent_cookie = layer.has_cookie(&request);

        let mut response = view(request).await;
        layer.save(&session, sent_cookie, &mut response).await;
        tracing::debug!(status = response.status().as_u16(), "request finished");
        response.into_response()
    }
    .instrument(span)
    .await
}
