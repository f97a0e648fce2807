//! Emitter error type.

use std::io;
use std::path::PathBuf;

use imprint_storage::StoreError;
use thiserror::Error;

/// Fatal emission failure.
///
/// Any of these aborts publication before the swap, leaving a previously
/// published output directory untouched.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to stage site in `{dir}`: {source}")]
    Stage {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to publish `{output}`: {source}")]
    Publish {
        output: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("artifact serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
