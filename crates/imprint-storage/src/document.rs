//! Source document model.

use thiserror::Error;

use crate::front_matter::{self, FrontMatterError};
use crate::store::{Store, StoreError};

/// Error loading a document from a store.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read from the store.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Store path of the document.
        path: String,
        /// Underlying store error.
        source: StoreError,
    },

    /// The document's front-matter block is not a valid YAML mapping.
    #[error("invalid front matter in {path}: {source}")]
    FrontMatter {
        /// Store path of the document.
        path: String,
        /// Underlying parse error.
        source: FrontMatterError,
    },
}

/// A source document: raw body plus declared front-matter.
///
/// Identity is the stable store path. Immutable once loaded for a build;
/// rebuilds reload from the store rather than mutating in place.
#[derive(Debug, Clone)]
pub struct Document {
    /// Forward-slash relative store path (e.g. `"01-basics/setup.md"`).
    pub source_path: String,
    /// Parsed front-matter mapping, `None` when the document has no block.
    pub front_matter: Option<serde_yaml::Mapping>,
    /// Body content with the front-matter block stripped.
    pub body: String,
    /// Last modification time, whole seconds since the Unix epoch.
    pub modified: u64,
}

impl Document {
    /// Load a document from a store, splitting and parsing front-matter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the store read fails or the
    /// front-matter block is not a valid YAML mapping.
    pub fn load(store: &dyn Store, path: &str) -> Result<Self, DocumentError> {
        let source = store.read(path).map_err(|source| DocumentError::Read {
            path: path.to_owned(),
            source,
        })?;
        let modified = store.mtime(path).map_err(|source| DocumentError::Read {
            path: path.to_owned(),
            source,
        })?;

        let (block, body) = front_matter::split(&source);
        let front_matter = block
            .map(front_matter::parse)
            .transpose()
            .map_err(|source| DocumentError::FrontMatter {
                path: path.to_owned(),
                source,
            })?;

        Ok(Self {
            source_path: path.to_owned(),
            front_matter,
            body: body.to_owned(),
            modified,
        })
    }

    /// Look up a front-matter value by key.
    #[must_use]
    pub fn front_matter_value(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.front_matter.as_ref()?.get(key)
    }
}
