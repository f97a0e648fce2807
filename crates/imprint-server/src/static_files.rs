//! Static file serving.
//!
//! Serves the emitted artifact set from disk. Extension-less paths
//! outside `payloads/` and `assets/` are client routes; they receive
//! the shell so deep links resolve to the application.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Create router for static file serving with SPA fallback.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_site)
}

/// Serve an artifact, or the shell for client routes.
async fn serve_site(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');

    let Some(relative) = sanitize(path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // Map root to the shell.
    let file_path = if relative.as_os_str().is_empty() {
        PathBuf::from("index.html")
    } else {
        relative
    };

    match tokio::fs::read(state.site_dir.join(&file_path)).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
            return ([(header::CONTENT_TYPE, mime.as_ref())], content).into_response();
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path, error = %err, "Failed to read artifact");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    // SPA fallback: serve the shell for client-side routing. Payload and
    // asset misses stay hard 404s so the client can report them.
    let is_client_route =
        !path.contains('.') && !path.starts_with("payloads/") && !path.starts_with("assets/");
    if is_client_route
        && let Ok(index) = tokio::fs::read(state.site_dir.join("index.html")).await
    {
        return (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            index,
        )
            .into_response();
    }

    StatusCode::NOT_FOUND.into_response()
}

/// Map a request path to a path below the artifact directory.
///
/// Rejects parent-directory and rooted components so a request cannot
/// escape the site directory.
fn sanitize(path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(clean)
}
