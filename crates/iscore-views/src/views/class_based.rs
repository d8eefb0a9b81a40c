//! Class-based views for iscore.
//!
//! ## Key Types
//!
//! - [`View`] - The base trait for all class-based views
//! - [`ContextMixin`] - Provides template context data
//! - [`TemplateResponseMixin`] - Renders a template with context through the [`Engine`]
//! - [`TemplateView`] - A concrete view that renders a template

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use iscore_core::IsCoreResult;
use iscore_http::{HttpRequest, HttpResponse};
use iscore_template::Engine;

/// Template context passed to [`Engine::render`].
pub type Context = serde_json::Map<String, serde_json::Value>;

/// A view turned into a plain async function, as produced by [`View::as_view`].
pub type ViewFunction = Arc<
    dyn Fn(HttpRequest) -> Pin<Box<dyn Future<Output = HttpResponse> + Send>> + Send + Sync,
>;

/// The base trait for class-based views.
///
/// Requests whose method is not in [`allowed_methods`](View::allowed_methods)
/// are answered with 405 and an `Allow` header. iscore's views are read-only,
/// so only GET, HEAD and OPTIONS are allowed unless a view says otherwise.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use iscore_http::{HttpRequest, HttpResponse};
/// use iscore_views::views::class_based::View;
///
/// struct Ping;
///
/// #[async_trait]
/// impl View for Ping {
///     async fn get(&self, _request: HttpRequest) -> HttpResponse {
///         HttpResponse::ok("pong")
///     }
/// }
/// ```
#[async_trait]
pub trait View: Send + Sync {
    /// Returns the list of HTTP methods this view allows.
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    /// Dispatches the request to the handler for its method.
    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        if !self.allowed_methods().contains(request.method()) {
            return self.http_method_not_allowed(request).await;
        }
        match *request.method() {
            http::Method::GET => self.get(request).await,
            http::Method::POST => self.post(request).await,
            http::Method::HEAD => self.head(request).await,
            http::Method::OPTIONS => self.options(request).await,
            _ => self.http_method_not_allowed(request).await,
        }
    }

    /// Handles GET requests. Returns 405 by default.
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    /// Handles POST requests. Returns 405 by default.
    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    /// Handles HEAD requests. Delegates to `get` and drops the body.
    async fn head(&self, request: HttpRequest) -> HttpResponse {
        let mut response = self.get(request).await;
        response.clear_content();
        response
    }

    /// Handles OPTIONS requests. Returns the list of allowed methods.
    async fn options(&self, _request: HttpRequest) -> HttpResponse {
        let mut response = HttpResponse::ok("");
        if let Ok(value) = http::header::HeaderValue::from_str(&allow_header(self)) {
            response.headers_mut().insert(http::header::ALLOW, value);
        }
        response
    }

    /// Returns a 405 Method Not Allowed response with the allowed methods header.
    async fn http_method_not_allowed(&self, request: HttpRequest) -> HttpResponse {
        tracing::warn!(
            method = %request.method(),
            path = %request.path(),
            "method not allowed"
        );
        let methods = self.allowed_methods();
        let method_strs: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        HttpResponse::not_allowed(&method_strs)
    }

    /// Converts this view into a [`ViewFunction`].
    #[allow(clippy::wrong_self_convention)]
    fn as_view(self) -> ViewFunction
    where
        Self: Sized + 'static,
    {
        let view = Arc::new(self);
        Arc::new(move |request: HttpRequest| -> Pin<Box<dyn Future<Output = HttpResponse> + Send>> {
            let view = Arc::clone(&view);
            Box::pin(async move { view.dispatch(request).await })
        })
    }
}

fn allow_header<V: View + ?Sized>(view: &V) -> String {
    view.allowed_methods()
        .iter()
        .map(http::Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Mixin that provides template context data.
pub trait ContextMixin {
    /// Returns the context for rendering a response to `request`.
    fn get_context_data(&self, request: &HttpRequest) -> IsCoreResult<Context>;
}

/// Mixin that renders a template with context data.
pub trait TemplateResponseMixin {
    /// Returns the template name.
    fn template_name(&self) -> &str;

    /// Returns the engine templates are rendered with.
    fn engine(&self) -> &Engine;

    /// Renders [`template_name`](Self::template_name) with `context`.
    ///
    /// A failed render is logged and turned into the error's status code.
    fn render_to_response(&self, context: Context) -> HttpResponse {
        let template_name = self.template_name();
        match self
            .engine()
            .render(template_name, &serde_json::Value::Object(context))
        {
            Ok(html) => {
                let mut response = HttpResponse::ok(html);
                response.set_content_type("text/html");
                response
            }
            Err(e) => {
                tracing::error!(template = template_name, error = %e, "failed to render template");
                HttpResponse::from_error(&e)
            }
        }
    }
}

/// A view that renders a template with a fixed context.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use iscore_template::Engine;
/// use iscore_views::views::class_based::TemplateView;
///
/// let view = TemplateView::new("registration/logout.html", Arc::new(Engine::new()))
///     .with_context("login_url", serde_json::json!("/login/"));
/// ```
#[derive(Debug, Clone)]
pub struct TemplateView {
    template: String,
    extra_context: Context,
    engine: Arc<Engine>,
}

impl TemplateView {
    /// Creates a new `TemplateView` that renders `template` with `engine`.
    pub fn new(template: &str, engine: Arc<Engine>) -> Self {
        Self {
            template: template.to_string(),
            extra_context: Context::new(),
            engine,
        }
    }

    /// Adds a value to the rendered context.
    #[must_use]
    pub fn with_context(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extra_context.insert(key.to_string(), value);
        self
    }
}

impl ContextMixin for TemplateView {
    fn get_context_data(&self, _request: &HttpRequest) -> IsCoreResult<Context> {
        Ok(self.extra_context.clone())
    }
}

impl TemplateResponseMixin for TemplateView {
    fn template_name(&self) -> &str {
        &self.template
    }

    fn engine(&self) -> &Engine {
        &self.engine
    }
}

#[async_trait]
impl View for TemplateView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        match self.get_context_data(&request) {
            Ok(context) => self.render_to_response(context),
            Err(e) => HttpResponse::from_error(&e),
        }
    }
}
