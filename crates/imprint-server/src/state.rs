//! Application state.

use std::path::PathBuf;

/// State shared across all request handlers.
pub(crate) struct AppState {
    /// Root of the emitted artifact set being served.
    pub(crate) site_dir: PathBuf,
}
