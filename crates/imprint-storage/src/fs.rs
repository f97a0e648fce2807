//! Filesystem store implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use glob::Pattern;

use crate::store::{Store, StoreError, StoreErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem store rooted at a source directory.
///
/// Store paths are resolved below the root; paths containing parent
/// components or an absolute prefix are rejected to keep reads jailed to
/// the source tree.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use imprint_storage::{FsStore, Store};
///
/// let store = FsStore::new(PathBuf::from("docs"));
/// let docs = store.scan("**/*.md")?;
/// ```
pub struct FsStore {
    /// Root directory of the store.
    root: PathBuf,
}

impl FsStore {
    /// Create a new filesystem store.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a store path stays below the root.
    ///
    /// Rejects absolute paths and paths containing parent components
    /// (`../`) to prevent traversal outside the source tree.
    fn validate_path(path: &str) -> Result<(), StoreError> {
        let escapes = Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StoreError::new(StoreErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a validated store path against the root.
    fn full_path(&self, path: &str) -> Result<PathBuf, StoreError> {
        Self::validate_path(path)?;
        Ok(self.root.join(path))
    }

    /// Walk a directory recursively, collecting files matching the pattern.
    fn walk(&self, dir: &Path, prefix: &str, pattern: &Pattern, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();

            // Skip hidden and underscore-prefixed files/dirs
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            let rel = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                // Skip common non-documentation directories
                if matches!(
                    name.as_str(),
                    "node_modules" | "target" | "dist" | "build" | "vendor"
                ) {
                    continue;
                }
                self.walk(&path, &rel, pattern, out);
            } else if pattern.matches(&rel) {
                out.push(rel);
            }
        }
    }
}

impl Store for FsStore {
    fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        self.walk(&self.root, "", &pattern, &mut paths);
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String, StoreError> {
        let full = self.full_path(path)?;
        fs::read_to_string(&full).map_err(|e| StoreError::io(e, Some(full)).with_backend(BACKEND))
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let full = self.full_path(path)?;
        fs::read(&full).map_err(|e| StoreError::io(e, Some(full)).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.full_path(path).is_ok_and(|full| full.exists())
    }

    fn mtime(&self, path: &str) -> Result<u64, StoreError> {
        let full = self.full_path(path)?;
        let metadata =
            fs::metadata(&full).map_err(|e| StoreError::io(e, Some(full.clone())).with_backend(BACKEND))?;
        let modified = metadata
            .modified()
            .map_err(|e| StoreError::io(e, Some(full)).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(FsStore: Send, Sync);

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = create_test_dir();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let docs = store.scan("**/*.md").unwrap();

        assert!(docs.is_empty());
    }

    #[test]
    fn test_scan_missing_dir() {
        let store = FsStore::new(PathBuf::from("/nonexistent"));
        let docs = store.scan("**/*.md").unwrap();

        assert!(docs.is_empty());
    }

    #[test]
    fn test_scan_is_sorted() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("zulu.md"), "# Z").unwrap();
        fs::write(temp_dir.path().join("alpha.md"), "# A").unwrap();
        fs::write(temp_dir.path().join("mike.md"), "# M").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let docs = store.scan("**/*.md").unwrap();

        assert_eq!(docs, vec!["alpha.md", "mike.md", "zulu.md"]);
    }

    #[test]
    fn test_scan_nested_structure() {
        let temp_dir = create_test_dir();
        let section = temp_dir.path().join("01-basics");
        fs::create_dir(&section).unwrap();
        fs::write(section.join("index.md"), "# Basics").unwrap();
        fs::write(section.join("setup.md"), "# Setup").unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Home").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let docs = store.scan("**/*.md").unwrap();

        assert_eq!(
            docs,
            vec!["01-basics/index.md", "01-basics/setup.md", "index.md"]
        );
    }

    #[test]
    fn test_scan_skips_hidden_and_underscore() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join(".draft.md"), "# Draft").unwrap();
        fs::write(temp_dir.path().join("_partial.md"), "# Partial").unwrap();
        fs::write(temp_dir.path().join("visible.md"), "# Visible").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let docs = store.scan("**/*.md").unwrap();

        assert_eq!(docs, vec!["visible.md"]);
    }

    #[test]
    fn test_scan_skips_node_modules() {
        let temp_dir = create_test_dir();
        let node_modules = temp_dir.path().join("node_modules");
        fs::create_dir(&node_modules).unwrap();
        fs::write(node_modules.join("package.md"), "# Package").unwrap();
        fs::write(temp_dir.path().join("main.md"), "# Main").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let docs = store.scan("**/*.md").unwrap();

        assert_eq!(docs, vec!["main.md"]);
    }

    #[test]
    fn test_scan_non_md_pattern() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("diagram.png"), [0_u8, 1, 2]).unwrap();
        fs::write(temp_dir.path().join("page.md"), "# Page").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let pngs = store.scan("**/*.png").unwrap();

        assert_eq!(pngs, vec!["diagram.png"]);
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide\n\nContent here.").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let content = store.read("guide.md").unwrap();

        assert_eq!(content, "# Guide\n\nContent here.");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = create_test_dir();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let err = store.read("nonexistent.md").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_bytes() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("logo.png"), [0x89_u8, 0x50, 0x4e, 0x47]).unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let bytes = store.read_bytes("logo.png").unwrap();

        assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_exists() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());

        assert!(store.exists("guide.md"));
        assert!(!store.exists("nonexistent.md"));
    }

    #[test]
    fn test_mtime_returns_epoch_seconds() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let mtime = store.mtime("guide.md").unwrap();

        let now = std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(mtime > now - 60);
        assert!(mtime <= now);
    }

    #[test]
    fn test_read_rejects_path_traversal() {
        let temp_dir = create_test_dir();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let err = store.read("../etc/passwd").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidPath);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_nested_traversal() {
        let temp_dir = create_test_dir();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let err = store.read("subdir/../../etc/passwd").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_absolute_path() {
        let temp_dir = create_test_dir();

        let store = FsStore::new(temp_dir.path().to_path_buf());
        let err = store.read("/etc/passwd").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidPath);
    }

    #[test]
    fn test_exists_rejects_path_traversal() {
        let temp_dir = create_test_dir();

        let store = FsStore::new(temp_dir.path().to_path_buf());

        assert!(!store.exists("../etc/passwd"));
    }
}
