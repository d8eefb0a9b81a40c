//! State shared by every view that works on a model core.

use std::fmt;
use std::sync::Arc;

use iscore_core::IsCoreResult;
use iscore_db::ModelMeta;
use iscore_http::HttpRequest;

use crate::model_core::ModelCore;
use crate::views::class_based::{Context, ContextMixin};

/// The core, site name and menu groups a core view is built with.
///
/// Contributes `site_name` and `menu_groups` to the template context.
#[derive(Clone)]
pub struct DefaultCoreViewMixin {
    core: Arc<dyn ModelCore>,
    site_name: String,
    menu_groups: Vec<String>,
    model: Arc<ModelMeta>,
}

impl DefaultCoreViewMixin {
    /// Creates the mixin for `core` on the site named `site_name`.
    pub fn new(core: Arc<dyn ModelCore>, site_name: impl Into<String>) -> Self {
        Self {
            model: core.model(),
            core,
            site_name: site_name.into(),
            menu_groups: Vec::new(),
        }
    }

    /// Sets the menu groups listed in the navigation.
    #[must_use]
    pub fn menu_groups(mut self, menu_groups: Vec<String>) -> Self {
        self.menu_groups = menu_groups;
        self
    }

    /// Overrides the model the view shows, which defaults to the core's.
    #[must_use]
    pub fn model(mut self, model: Arc<ModelMeta>) -> Self {
        self.model = model;
        self
    }

    /// Returns the core.
    pub fn core(&self) -> &dyn ModelCore {
        self.core.as_ref()
    }

    /// Returns the site name.
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Returns the model the view shows.
    pub fn get_model(&self) -> &ModelMeta {
        &self.model
    }
}

impl fmt::Debug for DefaultCoreViewMixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCoreViewMixin")
            .field("model", &self.model.model_key())
            .field("site_name", &self.site_name)
            .field("menu_groups", &self.menu_groups)
            .finish_non_exhaustive()
    }
}

impl ContextMixin for DefaultCoreViewMixin {
    fn get_context_data(&self, _request: &HttpRequest) -> IsCoreResult<Context> {
        let mut context = Context::new();
        context.insert("site_name".into(), self.site_name.clone().into());
        context.insert("menu_groups".into(), self.menu_groups.clone().into());
        Ok(context)
    }
}
