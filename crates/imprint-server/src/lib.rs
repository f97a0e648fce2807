//! Preview HTTP server for emitted imprint sites.
//!
//! Serves a published artifact set from disk: payloads, the manifest,
//! the search index, and assets resolve to files; extension-less paths
//! receive the shell so deep links into client routes work. Security
//! headers and gzip compression are applied to every response. No build
//! machinery lives here; the server only reads what the emitter wrote.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use imprint_server::{ServeOptions, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = ServeOptions {
//!         host: "127.0.0.1".to_owned(),
//!         port: 4173,
//!         site_dir: PathBuf::from("dist"),
//!     };
//!     run_server(options).await.unwrap();
//! }
//! ```

mod app;
mod security;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;

use state::AppState;

/// Server options.
#[derive(Clone, Debug)]
pub struct ServeOptions {
    /// Host address to bind to (an IP address, not a hostname).
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the emitted artifact set.
    pub site_dir: PathBuf,
}

/// Error returned by [`run_server`].
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("no emitted site at `{}` (missing index.html)", .0.display())]
    MissingSite(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the router serving an artifact directory.
///
/// Exposed separately from [`run_server`] so the routing behavior can be
/// exercised without binding a listener.
#[must_use]
pub fn router(site_dir: impl Into<PathBuf>) -> Router {
    let state = Arc::new(AppState {
        site_dir: site_dir.into(),
    });
    app::create_router(state)
}

/// Run the server until a shutdown signal arrives.
///
/// # Errors
///
/// Returns [`ServeError`] if the site directory holds no emitted site,
/// the listen address does not parse, or binding/serving fails.
pub async fn run_server(options: ServeOptions) -> Result<(), ServeError> {
    if !options.site_dir.join("index.html").is_file() {
        return Err(ServeError::MissingSite(options.site_dir));
    }

    let app = router(&options.site_dir);

    let addr_text = format!("{}:{}", options.host, options.port);
    let addr = SocketAddr::from_str(&addr_text).map_err(|source| ServeError::Address {
        addr: addr_text,
        source,
    })?;
    tracing::info!(
        address = %addr,
        site_dir = %options.site_dir.display(),
        "Starting preview server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server");
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[tokio::test]
    async fn test_missing_site_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = ServeOptions {
            host: "127.0.0.1".to_owned(),
            port: 4173,
            site_dir: dir.path().join("nope"),
        };

        let err = run_server(options).await.unwrap_err();
        assert!(matches!(err, ServeError::MissingSite(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unparseable_host_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<!DOCTYPE html>").unwrap();
        let options = ServeOptions {
            host: "not-an-address".to_owned(),
            port: 4173,
            site_dir: dir.path().to_path_buf(),
        };

        let err = run_server(options).await.unwrap_err();
        assert!(matches!(err, ServeError::Address { .. }), "got {err:?}");
    }
}
