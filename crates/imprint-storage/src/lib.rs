//! Document store abstraction for the imprint site compiler.
//!
//! Provides the [`Store`] trait for scanning and reading source documents,
//! with a filesystem backend ([`FsStore`]) and an in-memory backend
//! ([`MemoryStore`]) for tests and fixtures.
//!
//! # Path Convention
//!
//! All path parameters are **store paths**: forward-slash relative paths
//! below the store root (e.g. `"guide.md"`, `"01-basics/setup.md"`).
//! Backends map store paths to their internal representation; absolute
//! paths and parent-directory components are rejected.
//!
//! # Thread Safety
//!
//! [`Store`] is object-safe and bounded `Send + Sync`, so a store can
//! be shared between threads, e.g. as `Arc<dyn Store>`.

mod document;
mod fs;
pub mod front_matter;
mod memory;
mod store;

pub use document::{Document, DocumentError};
pub use fs::FsStore;
pub use front_matter::FrontMatterError;
pub use memory::MemoryStore;
pub use store::{Store, StoreError, StoreErrorKind};
