//! Build error types.
//!
//! [`SiteError`] covers every fatal condition that aborts a build. Anything
//! recoverable (missing titles, unresolved footnotes, navigation asymmetry)
//! is reported as a warning on [`CompiledSite`](crate::CompiledSite) instead.

use imprint_renderer::PipelineError;
use imprint_storage::{DocumentError, StoreError};
use thiserror::Error;

/// Fatal build error.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Store scan or read failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Document load or front-matter parse failure.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Transform pipeline configuration failure (unknown extension name).
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A front-matter key has a value of the wrong type.
    #[error("invalid front matter in `{path}`: {reason}")]
    FrontMatter {
        /// Store path of the offending document.
        path: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// Two documents resolve to the same canonical route.
    #[error("route collision: `{first}` and `{second}` both resolve to `/{route}`")]
    RouteCollision {
        /// The contested route.
        route: String,
        /// Store path of the document that claimed the route first.
        first: String,
        /// Store path of the document that collided with it.
        second: String,
    },

    /// An explicit `prev`/`next` override names a document that doesn't exist.
    #[error("unresolved `{key}` override in `{path}`: no document for `{target}`")]
    UnresolvedOverride {
        /// Store path of the document carrying the override.
        path: String,
        /// Which key carried the override.
        key: &'static str,
        /// The target as written in front matter.
        target: String,
    },

    /// A document body links to markdown files that aren't in the store.
    #[error("unresolved cross-references in `{path}`: {}", targets.join(", "))]
    UnresolvedReferences {
        /// Store path of the linking document.
        path: String,
        /// Normalized store paths of the missing targets.
        targets: Vec<String>,
    },

    /// The manifest could not be serialized for hashing.
    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_collision_names_both_documents() {
        let err = SiteError::RouteCollision {
            route: "intro".to_owned(),
            first: "01-intro.md".to_owned(),
            second: "intro.md".to_owned(),
        };

        let message = err.to_string();

        assert!(message.contains("01-intro.md"));
        assert!(message.contains("intro.md"));
        assert!(message.contains("/intro"));
    }

    #[test]
    fn test_unresolved_references_lists_targets() {
        let err = SiteError::UnresolvedReferences {
            path: "guide.md".to_owned(),
            targets: vec!["missing.md".to_owned(), "gone/too.md".to_owned()],
        };

        assert_eq!(
            err.to_string(),
            "unresolved cross-references in `guide.md`: missing.md, gone/too.md"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        static_assertions::assert_impl_all!(SiteError: Send, Sync);
    }
}
