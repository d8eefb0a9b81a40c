//! Model registry.
//!
//! [`ModelRegistry`] maps `app_label.model_name` keys to shared
//! [`ModelMeta`] instances so that relation fields, which only know the key
//! of their target, can be followed.

use std::collections::HashMap;
use std::sync::Arc;

use iscore_core::{IsCoreError, IsCoreResult};

use crate::fields::FieldDef;
use crate::model::ModelMeta;

/// The registry of known models.
///
/// # Examples
///
/// ```
/// use iscore_db::{FieldDef, FieldType, ModelMeta, ModelRegistry, OnDelete};
///
/// let mut registry = ModelRegistry::new();
/// registry.register(ModelMeta::new("library", "author")).unwrap();
/// let book = registry
///     .register(ModelMeta::new("library", "book").field(FieldDef::new(
///         "author",
///         FieldType::ForeignKey { to: "library.author".into(), on_delete: OnDelete::Cascade },
///     )))
///     .unwrap();
///
/// let author_field = book.get_field("author").unwrap();
/// let author = registry.related_model(author_field).unwrap();
/// assert_eq!(author.model_name, "author");
/// ```
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<ModelMeta>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model and returns the shared handle to it.
    ///
    /// Registering the same key twice is a configuration error.
    pub fn register(&mut self, meta: ModelMeta) -> IsCoreResult<Arc<ModelMeta>> {
        let key = meta.model_key();
        if self.models.contains_key(&key) {
            return Err(IsCoreError::ImproperlyConfigured(format!(
                "Model '{key}' is already registered"
            )));
        }
        tracing::debug!(model = %key, fields = meta.fields.len(), "registered model");
        let meta = Arc::new(meta);
        self.models.insert(key, Arc::clone(&meta));
        Ok(meta)
    }

    /// Looks up a model by its `app_label.model_name` key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<Arc<ModelMeta>> {
        self.models.get(&key.to_lowercase()).cloned()
    }

    /// Returns `true` if a model with this key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(&key.to_lowercase())
    }

    /// Resolves the model a relation field points at.
    ///
    /// Fails with `FieldDoesNotExist` if `field` is not a relation, and with
    /// `ImproperlyConfigured` if its target was never registered.
    pub fn related_model(&self, field: &FieldDef) -> IsCoreResult<Arc<ModelMeta>> {
        let target = field
            .related_model()
            .ok_or_else(|| IsCoreError::FieldDoesNotExist {
                model: "relation".to_string(),
                field: field.name.clone(),
            })?;
        self.get(target).ok_or_else(|| {
            IsCoreError::ImproperlyConfigured(format!(
                "Field '{}' points at '{target}', which is not a registered model",
                field.name
            ))
        })
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Returns the registered model keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.models.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldType, OnDelete};

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry
            .register(ModelMeta::new("library", "author"))
            .unwrap();
        registry
            .register(
                ModelMeta::new("library", "book")
                    .field(FieldDef::new("title", FieldType::CharField))
                    .field(FieldDef::new(
                        "publisher",
                        FieldType::ForeignKey {
                            to: "library.publisher".into(),
                            on_delete: OnDelete::SetNull,
                        },
                    )),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Library.Author"));
        assert_eq!(registry.get("library.book").unwrap().model_name, "book");
        assert!(registry.get("library.shelf").is_none());
        assert_eq!(registry.keys(), vec!["library.author", "library.book"]);
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = registry();
        let err = registry
            .register(ModelMeta::new("library", "author"))
            .unwrap_err();
        assert!(matches!(err, IsCoreError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_related_model_not_a_relation() {
        let registry = registry();
        let book = registry.get("library.book").unwrap();
        let err = registry
            .related_model(book.get_field("title").unwrap())
            .unwrap_err();
        assert!(matches!(err, IsCoreError::FieldDoesNotExist { .. }));
    }

    #[test]
    fn test_related_model_unregistered_target() {
        let registry = registry();
        let book = registry.get("library.book").unwrap();
        let err = registry
            .related_model(book.get_field("publisher").unwrap())
            .unwrap_err();
        assert!(matches!(err, IsCoreError::ImproperlyConfigured(_)));
        assert!(err.to_string().contains("library.publisher"));
    }
}
