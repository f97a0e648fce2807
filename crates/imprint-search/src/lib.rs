//! Client-side search index construction.
//!
//! [`IndexBuilder`] accumulates the plain-text sections of rendered pages
//! and freezes them into a [`SearchIndex`]: a sorted route table plus a
//! term-to-postings map. The serialized index ships to the browser, which
//! performs prefix and substring matching over the term keys without any
//! server round-trip. The index is rebuilt in full on every build.
//!
//! ```
//! use imprint_renderer::Section;
//! use imprint_search::IndexBuilder;
//!
//! let mut builder = IndexBuilder::new();
//! builder.add_page(
//!     "guide/install",
//!     &[Section {
//!         anchor: "download".to_owned(),
//!         heading: "Download".to_owned(),
//!         body: "Fetch the latest release.".to_owned(),
//!     }],
//! );
//! let index = builder.finish("0d26fc40ab91e2f7");
//!
//! assert_eq!(index.routes, ["guide/install"]);
//! assert_eq!(index.entries["download"][0].weight, 2);
//! assert_eq!(index.entries["latest"][0].weight, 1);
//! ```

mod index;
mod tokenize;

pub use index::{IndexBuilder, Posting, SEARCH_SCHEMA_VERSION, SearchIndex};
pub use tokenize::tokenize;
