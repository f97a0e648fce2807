//! In-memory store implementation for testing.
//!
//! Provides [`MemoryStore`] for unit testing without filesystem access.

use std::collections::BTreeMap;

use glob::Pattern;

use crate::store::{Store, StoreError, StoreErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Memory";

/// A stored file: raw bytes plus modification time.
#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    mtime: u64,
}

/// In-memory store for testing.
///
/// Holds files in a sorted map so scan order matches the filesystem
/// store's sorted output. Use the builder methods to configure the store
/// with test data.
///
/// # Example
///
/// ```ignore
/// use imprint_storage::{MemoryStore, Store};
///
/// let store = MemoryStore::new()
///     .with_file("guide.md", "# User Guide\n\nContent.");
///
/// let docs = store.scan("**/*.md").unwrap();
/// let content = store.read("guide.md").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Entry>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file at the given store path.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(
            path.into(),
            Entry {
                data: content.into().into_bytes(),
                mtime: 0,
            },
        );
        self
    }

    /// Add a binary file at the given store path.
    #[must_use]
    pub fn with_bytes(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.files.insert(
            path.into(),
            Entry {
                data: data.into(),
                mtime: 0,
            },
        );
        self
    }

    /// Set modification time (seconds since Unix epoch) for a path.
    ///
    /// The file must already have been added.
    #[must_use]
    pub fn with_mtime(mut self, path: &str, mtime: u64) -> Self {
        if let Some(entry) = self.files.get_mut(path) {
            entry.mtime = mtime;
        }
        self
    }

    fn entry(&self, path: &str) -> Result<&Entry, StoreError> {
        self.files
            .get(path)
            .ok_or_else(|| StoreError::not_found(path).with_backend(BACKEND))
    }
}

impl Store for MemoryStore {
    fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        // BTreeMap keys iterate in sorted order
        Ok(self
            .files
            .keys()
            .filter(|path| pattern.matches(path))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StoreError> {
        let entry = self.entry(path)?;
        String::from_utf8(entry.data.clone()).map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidEncoding)
                .with_path(path)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        Ok(self.entry(path)?.data.clone())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn mtime(&self, path: &str) -> Result<u64, StoreError> {
        Ok(self.entry(path)?.mtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(MemoryStore: Send, Sync);

    #[test]
    fn test_new_empty() {
        let store = MemoryStore::new();
        let docs = store.scan("**/*.md").unwrap();

        assert!(docs.is_empty());
    }

    #[test]
    fn test_with_file_read() {
        let store = MemoryStore::new().with_file("guide.md", "# Guide\n\nContent.");

        let content = store.read("guide.md").unwrap();

        assert_eq!(content, "# Guide\n\nContent.");
    }

    #[test]
    fn test_scan_sorted() {
        let store = MemoryStore::new()
            .with_file("zulu.md", "z")
            .with_file("alpha.md", "a")
            .with_file("mike.md", "m");

        let docs = store.scan("**/*.md").unwrap();

        assert_eq!(docs, vec!["alpha.md", "mike.md", "zulu.md"]);
    }

    #[test]
    fn test_scan_filters_by_pattern() {
        let store = MemoryStore::new()
            .with_file("guide.md", "g")
            .with_bytes("logo.png", vec![1_u8, 2, 3]);

        let docs = store.scan("**/*.md").unwrap();
        let images = store.scan("**/*.png").unwrap();

        assert_eq!(docs, vec!["guide.md"]);
        assert_eq!(images, vec!["logo.png"]);
    }

    #[test]
    fn test_scan_matches_nested_paths() {
        let store = MemoryStore::new()
            .with_file("01-basics/index.md", "b")
            .with_file("index.md", "i");

        let docs = store.scan("**/*.md").unwrap();

        assert_eq!(docs, vec!["01-basics/index.md", "index.md"]);
    }

    #[test]
    fn test_read_missing() {
        let store = MemoryStore::new();

        let err = store.read("missing.md").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.backend, Some("Memory"));
        assert_eq!(err.path.as_deref(), Some(std::path::Path::new("missing.md")));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let store = MemoryStore::new().with_bytes("binary.md", vec![0xff_u8, 0xfe]);

        let err = store.read("binary.md").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidEncoding);
    }

    #[test]
    fn test_read_bytes() {
        let store = MemoryStore::new().with_bytes("logo.png", vec![0x89_u8, 0x50]);

        let bytes = store.read_bytes("logo.png").unwrap();

        assert_eq!(bytes, vec![0x89, 0x50]);
    }

    #[test]
    fn test_exists() {
        let store = MemoryStore::new().with_file("guide.md", "content");

        assert!(store.exists("guide.md"));
        assert!(!store.exists("missing.md"));
    }

    #[test]
    fn test_with_mtime() {
        let store = MemoryStore::new()
            .with_file("guide.md", "content")
            .with_mtime("guide.md", 1_234_567_890);

        let mtime = store.mtime("guide.md").unwrap();

        assert_eq!(mtime, 1_234_567_890);
    }

    #[test]
    fn test_mtime_defaults_to_zero() {
        let store = MemoryStore::new().with_file("guide.md", "content");

        assert_eq!(store.mtime("guide.md").unwrap(), 0);
    }

    #[test]
    fn test_mtime_missing() {
        let store = MemoryStore::new();

        let err = store.mtime("missing.md").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.backend, Some("Memory"));
    }
}
