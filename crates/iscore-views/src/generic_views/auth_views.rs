//! Authentication views.

use std::sync::Arc;

use async_trait::async_trait;

use iscore_http::{HttpRequest, HttpResponse};
use iscore_template::Engine;

use crate::views::class_based::{TemplateView, View};

/// Logs the requester out and renders `registration/logout.html`.
///
/// The page is rendered whether or not anybody was logged in.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use iscore_template::Engine;
/// use iscore_views::generic_views::LogoutView;
///
/// let view = LogoutView::new(Arc::new(Engine::new())).login_url("/login/");
/// ```
#[derive(Debug, Clone)]
pub struct LogoutView {
    template: TemplateView,
}

impl LogoutView {
    /// The template the view renders.
    pub const TEMPLATE_NAME: &'static str = "registration/logout.html";

    /// Creates the view.
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            template: TemplateView::new(Self::TEMPLATE_NAME, engine),
        }
    }

    /// Sets the `login_url` the page links back to.
    #[must_use]
    pub fn login_url(mut self, url: &str) -> Self {
        self.template = self.template.with_context("login_url", url.into());
        self
    }

    /// Sets the `site_name` shown on the page.
    #[must_use]
    pub fn site_name(mut self, site_name: &str) -> Self {
        self.template = self.template.with_context("site_name", site_name.into());
        self
    }
}

#[async_trait]
impl View for LogoutView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        if iscore_auth::is_authenticated(&request) {
            iscore_auth::logout(&request);
        }
        self.template.get(request).await
    }
}
