//! CLI error types.

use imprint_config::ConfigError;
use imprint_emitter::EmitError;
use imprint_server::ServeError;
use imprint_site::SiteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Emit(#[from] EmitError),

    #[error("{0}")]
    Serve(#[from] ServeError),

    #[error("{0}")]
    Validation(String),
}
