//! Fallback routing for everything no API route claimed.
//!
//! Paths under `/api` get a JSON 404. Any other GET/HEAD path is served from the
//! static directory when it names a file there, and otherwise receives the SPA entry
//! document so the front-end router can take over.

use std::path::{Component, Path, PathBuf};

use actix_files::NamedFile;
use actix_web::http::header::{self, ContentType, HeaderValue};
use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppError;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api";
pub const INDEX_DOCUMENT: &str = "index.html";

/// Served in place of the SPA when no front-end bundle is deployed.
pub const LANDING_PAGE: &str = "<h1>Bookshelf API is running</h1>\
<p>POST /init_db to initialize the database and POST /register to create a user.</p>";

pub fn is_api_path(path: &str) -> bool {
    path == API_PREFIX
        || path
            .strip_prefix(API_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Default service for `/api` scopes.
pub async fn api_not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(not_found(&req))
}

/// Default service for API resources that only accept some methods.
pub async fn api_method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(method_not_allowed(&req))
}

/// Default service for the whole application.
pub async fn fallback(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if is_api_path(req.path()) {
        return Err(not_found(&req));
    }
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Err(method_not_allowed(&req));
    }

    let root = state.config.static_dir.as_path();

    if let Some(relative) = sanitize_relative_path(req.path()) {
        let candidate = root.join(relative);
        if is_file(&candidate).await {
            return serve_file(&req, candidate).await;
        }
    }

    let index = root.join(INDEX_DOCUMENT);
    if is_file(&index).await {
        let mut response = serve_file(&req, index).await?;
        // Entry document is always revalidated.
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        return Ok(response);
    }

    log::debug!("No SPA bundle at {}; serving landing page", root.display());
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(LANDING_PAGE))
}

fn method_not_allowed(req: &HttpRequest) -> AppError {
    AppError::MethodNotAllowed(format!(
        "{} is not supported on {}",
        req.method(),
        req.path()
    ))
}

fn not_found(req: &HttpRequest) -> AppError {
    log::debug!("No API route for {} {}", req.method(), req.path());
    AppError::NotFound("Not Found".into())
}

/// Turns a request path into a path relative to the static root.
///
/// Returns `None` for the root path and for anything that would escape the root.
pub fn sanitize_relative_path(requested_path: &str) -> Option<PathBuf> {
    let requested = Path::new(requested_path.trim_start_matches('/'));
    let mut sanitized = PathBuf::new();

    for component in requested.components() {
        match component {
            Component::Normal(part) => sanitized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if sanitized.as_os_str().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn serve_file(req: &HttpRequest, path: PathBuf) -> Result<HttpResponse, AppError> {
    let file = NamedFile::open_async(&path).await.map_err(|e| {
        AppError::InternalServerError(format!("Failed to open {}: {}", path.display(), e))
    })?;
    Ok(file.into_response(req))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_api_path() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/"));
        assert!(is_api_path("/api/auth/unknown"));
        assert!(!is_api_path("/apiary"));
        assert!(!is_api_path("/"));
        assert!(!is_api_path("/books/api"));
    }

    #[test]
    fn test_sanitize_relative_path() {
        assert_eq!(
            sanitize_relative_path("/assets/app.js"),
            Some(PathBuf::from("assets/app.js"))
        );
        assert_eq!(
            sanitize_relative_path("/./favicon.ico"),
            Some(PathBuf::from("favicon.ico"))
        );
        assert_eq!(sanitize_relative_path("/"), None);
        assert_eq!(sanitize_relative_path(""), None);
        assert_eq!(sanitize_relative_path("/../etc/passwd"), None);
        assert_eq!(sanitize_relative_path("/assets/../../secret"), None);
    }
}
