//! Store trait and error types.
//!
//! Provides the core [`Store`] trait for abstracting document scanning and
//! retrieval, along with [`StoreError`] for unified error handling across
//! backends.

use std::path::PathBuf;

/// Semantic error categories for store operations.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path (traversal, absolute path, bad pattern).
    InvalidPath,
    /// Content is not valid UTF-8 text.
    InvalidEncoding,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_path(path)
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StoreErrorKind::InvalidEncoding,
            _ => StoreErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::InvalidPath => "Invalid path",
            StoreErrorKind::InvalidEncoding => "Invalid encoding",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Store abstraction for document scanning and retrieval.
///
/// All paths are forward-slash relative store paths. Enumeration order from
/// [`scan`](Store::scan) is sorted and therefore deterministic; it is the
/// tie-break order for everything built on top of the store.
pub trait Store: Send + Sync {
    /// Scan for files matching a glob pattern (e.g. `"**/*.md"`).
    ///
    /// Returns sorted store paths.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the pattern is invalid or scanning fails.
    fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file doesn't exist, can't be read, or
    /// is not valid UTF-8.
    fn read(&self, path: &str) -> Result<String, StoreError>;

    /// Read a file as raw bytes (used for asset copying).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file doesn't exist or can't be read.
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Check if a file exists at the given store path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Get modification time as whole seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file doesn't exist or mtime can't be
    /// retrieved.
    fn mtime(&self, path: &str) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_store_error_new() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert!(err.path.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_store_error_with_path() {
        let err = StoreError::new(StoreErrorKind::NotFound).with_path("docs/guide.md");

        assert_eq!(err.path.as_deref(), Some(Path::new("docs/guide.md")));
    }

    #[test]
    fn test_store_error_not_found() {
        let err = StoreError::not_found("guide.md");

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("guide.md")));
    }

    #[test]
    fn test_store_error_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StoreError::io(io_err, Some(PathBuf::from("guide.md")));

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("guide.md")));
    }

    #[test]
    fn test_store_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StoreError::io(io_err, None);

        assert_eq!(err.kind, StoreErrorKind::PermissionDenied);
    }

    #[test]
    fn test_store_error_display_simple() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_store_error_display_with_backend() {
        let err = StoreError::new(StoreErrorKind::NotFound).with_backend("Fs");

        assert_eq!(err.to_string(), "[Fs] Not found");
    }

    #[test]
    fn test_store_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StoreError::new(StoreErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("docs/guide.md")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: docs/guide.md)"
        );
    }

    #[test]
    fn test_store_error_is_send_sync() {
        static_assertions::assert_impl_all!(StoreError: Send, Sync);
    }
}
