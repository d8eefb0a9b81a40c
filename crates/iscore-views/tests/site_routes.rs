//! End-to-end tests of the site router: sessions, permissions, logout.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use iscore_auth::SessionUser;
use iscore_core::Settings;
use iscore_db::{ComputedColumn, FieldDef, FieldType, ModelMeta, ModelRegistry, OnDelete};
use iscore_http::{HttpRequest, HttpResponse};
use iscore_template::Engine;
use iscore_views::model_core::{ListAction, ReadPermission, UiModelCore};
use iscore_views::site::IsCoreSite;
use iscore_views::views::class_based::View;

/// Logs in as a staff user on GET.
struct StaffLogin;

#[async_trait]
impl View for StaffLogin {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        iscore_auth::login(&request, &SessionUser::new("admin").staff());
        HttpResponse::ok("logged in")
    }
}

fn router() -> axum::Router {
    let mut registry = ModelRegistry::new();
    registry
        .register(
            ModelMeta::new("library", "author")
                .field(FieldDef::new("name", FieldType::CharField).max_length(100)),
        )
        .unwrap();
    let book = registry
        .register(
            ModelMeta::new("library", "book")
                .field(FieldDef::new("title", FieldType::CharField).max_length(200))
                .field(FieldDef::new("published", FieldType::BooleanField))
                .field(FieldDef::new(
                    "author",
                    FieldType::ForeignKey {
                        to: "library.author".into(),
                        on_delete: OnDelete::Cascade,
                    },
                ))
                .computed(ComputedColumn::new("age", "Years in print")),
        )
        .unwrap();
    let author = registry.get("library.author").unwrap();

    let mut site = IsCoreSite::new(Settings::default(), registry, Engine::new())
        .route("/login/", StaffLogin);
    site.register(Arc::new(
        UiModelCore::new(book)
            .menu_group("books")
            .list_display(["title", "author__name", "published", "age"])
            .default_filter("published", "1")
            .list_action(ListAction::new("export", "Export", "ajax")),
    ))
    .unwrap();
    site.register(Arc::new(
        UiModelCore::new(author).read_permission(ReadPermission::Anyone),
    ))
    .unwrap();
    site.into_axum_router()
}

async fn get(router: &axum::Router, uri: &str, cookie: Option<&str>) -> http::Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn session_cookie(response: &http::Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sessionid="))
        .and_then(|v| v.split(';').next())
        .map(String::from)
}

#[tokio::test]
async fn anonymous_list_is_forbidden() {
    let router = router();
    let response = get(&router, "/books/", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_list_renders_for_anyone() {
    let router = router();
    let response = get(&router, "/author/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains("<title>List authors</title>"));
    // the default list display includes the implicit primary key
    assert!(html.contains(r#"<th data-field="id" class="sortable">ID</th>"#));
    assert!(html.contains(r#"data-filter="name__contains""#));
}

#[tokio::test]
async fn staff_session_can_list_books() {
    let router = router();
    let login = get(&router, "/login/", None).await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login).expect("login sets the session cookie");

    let response = get(&router, "/books/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let html = body_text(response).await;
    assert!(html.contains("<title>List books</title>"));
    assert!(html.contains(r#"<th data-field="author__name" class="sortable">name</th>"#));
    assert!(html.contains(r#"<th data-field="age">Years in print</th>"#));
    assert!(html.contains(r#"name="filter__published""#));
    assert!(html.contains(r#"data-add-url-name="iscore:add-books""#));
    assert!(html.contains(r#"data-api-url-name="api-books""#));
    assert!(html.contains(r#"data-filter="published=1""#));
    assert!(html.contains(r#"<li data-action="export" data-type="ajax">Export</li>"#));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let router = router();
    let login = get(&router, "/login/", None).await;
    let cookie = session_cookie(&login).unwrap();

    let logout = get(&router, "/logout/", Some(&cookie)).await;
    assert_eq!(logout.status(), StatusCode::OK);
    assert_eq!(
        session_cookie(&logout).as_deref(),
        Some("sessionid="),
        "logout clears the cookie"
    );
    let html = body_text(logout).await;
    assert!(html.contains("Logged out"));
    assert!(html.contains(r#"href="&#x2F;login&#x2F;""#));

    // the old session key no longer grants access
    let response = get(&router, "/books/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn head_on_logout_also_ends_the_session() {
    let router = router();
    let login = get(&router, "/login/", None).await;
    let cookie = session_cookie(&login).unwrap();

    let head = router
        .clone()
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri("/logout/")
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(head.status(), StatusCode::OK);
    assert_eq!(session_cookie(&head).as_deref(), Some("sessionid="));
    assert!(body_text(head).await.is_empty());

    let response = get(&router, "/books/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_logout_renders_page() {
    let router = router();
    let response = get(&router, "/logout/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    assert!(body_text(response).await.contains("Logged out"));
}

#[tokio::test]
async fn post_to_logout_is_not_allowed() {
    let router = router();
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(http::header::ALLOW).unwrap(),
        "GET, HEAD, OPTIONS"
    );
}

#[tokio::test]
async fn unknown_group_is_not_found() {
    let router = router();
    let response = get(&router, "/shelves/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
