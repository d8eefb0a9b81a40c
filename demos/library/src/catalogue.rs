//! The demo's models and their cores.

use std::sync::Arc;

use iscore::prelude::*;

/// Registers `library.author` and `library.book`.
pub fn build_registry() -> IsCoreResult<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    registry.register(
        ModelMeta::new("library", "author")
            .field(FieldDef::new("name", FieldType::CharField).max_length(100))
            .field(FieldDef::new("email", FieldType::EmailField).blank())
            .field(FieldDef::new("born", FieldType::DateField).nullable())
            .computed(ComputedColumn::new("book_count", "Books written")),
    )?;
    registry.register(
        ModelMeta::new("library", "book")
            .field(FieldDef::new("title", FieldType::CharField).max_length(200))
            .field(FieldDef::new("summary", FieldType::TextField).blank())
            .field(FieldDef::new("published", FieldType::BooleanField))
            .field(FieldDef::new("pages", FieldType::PositiveIntegerField).verbose_name("page count"))
            .field(
                FieldDef::new("format", FieldType::CharField)
                    .max_length(2)
                    .choices([("hc", "Hardcover"), ("pb", "Paperback"), ("eb", "E-book")]),
            )
            .field(FieldDef::new(
                "author",
                FieldType::ForeignKey {
                    to: "library.author".into(),
                    on_delete: OnDelete::Cascade,
                },
            ))
            .computed(ComputedColumn::new("age", "Years in print")),
    )?;
    Ok(registry)
}

/// The cores served by the demo: books for staff, authors for anyone.
pub fn cores(registry: &ModelRegistry) -> IsCoreResult<Vec<UiModelCore>> {
    let model = |key: &str| {
        registry
            .get(key)
            .ok_or_else(|| IsCoreError::ImproperlyConfigured(format!("{key} is not registered")))
    };

    let books = UiModelCore::new(model("library.book")?)
        .menu_group("books")
        .list_display([
            ListDisplay::from("title"),
            ListDisplay::Nested("author".into(), vec!["name".into(), "email".into()]),
            ListDisplay::from("author__name"),
            ListDisplay::from("published"),
            ListDisplay::from("pages"),
            ListDisplay::from("format"),
            ListDisplay::from("age"),
        ])
        .default_filter("published", "1")
        .list_action(ListAction::new("export", "Export CSV", "link").url_name("books-export"));

    let authors = UiModelCore::new(model("library.author")?)
        .menu_group("authors")
        .list_display(["name", "email", "born", "book_count"])
        .read_permission(ReadPermission::Anyone);

    Ok(vec![books, authors])
}

/// Registers every core on `site`.
pub fn register_cores(site: &mut IsCoreSite, registry: &ModelRegistry) -> IsCoreResult<()> {
    for core in cores(registry)? {
        site.register(Arc::new(core))?;
    }
    Ok(())
}
