//! Site assembly for imprint.
//!
//! This crate turns a store of markdown documents into a compiled site:
//! normalized metadata per document, canonical routes, a navigation tree
//! with a linear reading order, resolved prev/next links, rendered page
//! HTML, and the sealed [`BuildManifest`] that ties a build together.
//!
//! # Quick Start
//!
//! ```
//! use imprint_site::{CompileOptions, compile};
//! use imprint_storage::MemoryStore;
//!
//! let store = MemoryStore::new()
//!     .with_file("index.md", "# Welcome\n\nHello.")
//!     .with_file("01-guide/01-setup.md", "---\ntitle: Setup\n---\nInstall it.");
//!
//! let site = compile(&store, &CompileOptions::default()).unwrap();
//!
//! assert_eq!(site.pages[0].route, "guide/setup");
//! assert_eq!(site.manifest.nav[0].title, "Guide");
//! assert_eq!(site.manifest.generation.len(), 16);
//! ```

mod build;
mod error;
mod manifest;
mod metadata;
mod nav;
mod routes;

pub use build::{CompileOptions, CompiledPage, CompiledSite, compile};
pub use error::SiteError;
pub use manifest::{
    BuildManifest, ExternalLink, MANIFEST_SCHEMA_VERSION, NavEntry, RouteEntry, SiteInfo,
};
pub use metadata::{DocRecord, LinkOverride, MetadataExtractor, PageMetadata, title_from_name};
pub use nav::{LinkResolution, NavLink, NavNode, NavTree, PageLinks, resolve_links};
pub use routes::RouteTable;
