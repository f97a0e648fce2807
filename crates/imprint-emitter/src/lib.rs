//! Static artifact emission for imprint.
//!
//! Turns a [`CompiledSite`](imprint_site::CompiledSite) and its search
//! index into the published artifact set:
//!
//! - `index.html`, the application shell with its mount points,
//! - `manifest.json`, the routing and navigation snapshot,
//! - `payloads/<route>.json`, one content payload per page,
//! - `search-index.json`, the client-side search index,
//! - `assets/`, the client runtime plus every referenced store asset.
//!
//! Emission is atomic: everything is staged in a hidden sibling
//! directory and swapped into place with renames, so a failed emit
//! never corrupts a previously published site.
//!
//! # Quick Start
//!
//! ```
//! use imprint_emitter::{EmitOptions, emit};
//! use imprint_search::SearchIndex;
//! use imprint_site::{CompileOptions, compile};
//! use imprint_storage::MemoryStore;
//!
//! let store = MemoryStore::new().with_file("index.md", "# Home\n\nHello.");
//! let site = compile(&store, &CompileOptions::default()).unwrap();
//! let pages = site.pages.iter().map(|p| (p.route.as_str(), p.sections.as_slice()));
//! let index = SearchIndex::build(&site.manifest.generation, pages);
//!
//! let out = tempfile::tempdir().unwrap();
//! let options = EmitOptions::new(out.path().join("dist"));
//! let report = emit(&site, &index, &store, &options).unwrap();
//!
//! assert!(report.output_dir.join("index.html").exists());
//! assert!(report.output_dir.join("payloads/index.json").exists());
//! ```

mod emit;
mod error;
mod payload;
mod shell;

pub use emit::{EmitOptions, EmitReport, emit};
pub use error::EmitError;
pub use payload::PagePayload;
pub use shell::{ShellOptions, render_shell};
