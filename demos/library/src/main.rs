//! # library-demo
//!
//! Serves a small library catalogue with iscore:
//!
//! - `GET /login/?user=<name>` logs in as a staff user (demo only)
//! - `GET /books/` lists books (staff only)
//! - `GET /authors/` lists authors (anyone)
//! - `GET /logout/` ends the session
//!
//! Settings come from `library.toml` (or the file named by
//! `LIBRARY_SETTINGS`) when present, then from `ISCORE_*` variables.

mod catalogue;
mod settings;

use std::path::PathBuf;

use async_trait::async_trait;

use iscore::http::HttpResponseRedirect;
use iscore::prelude::*;

/// Logs the `user` query parameter in as staff and redirects to the books.
struct DemoLogin;

#[async_trait]
impl View for DemoLogin {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        let Some(username) = request.get().get("user").filter(|u| !u.is_empty()) else {
            return HttpResponse::bad_request("pass ?user=<name> to log in");
        };
        iscore::auth::login(&request, &SessionUser::new(username).staff());
        HttpResponseRedirect::new("/books/")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::var_os("LIBRARY_SETTINGS")
        .map_or_else(|| PathBuf::from("library.toml"), PathBuf::from);
    let settings = settings::load_settings(&path)?;
    iscore::core::logging::setup_logging(&settings);
    tracing::info!(site = %settings.site_name, debug = settings.debug, "settings loaded");

    let registry = catalogue::build_registry()?;
    let engine = Engine::from_settings(&settings)?;
    let bind_address = settings.bind_address.clone();

    let mut site = IsCoreSite::new(settings, registry.clone(), engine).route("/login/", DemoLogin);
    catalogue::register_cores(&mut site, &registry)?;
    tracing::debug!(?site, "site configured");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %bind_address, "listening");
    axum::serve(listener, site.into_axum_router()).await?;
    Ok(())
}
