//! Markdown transform pipeline with composable syntax extensions.
//!
//! This crate renders markdown documents to HTML through a
//! [`TransformPipeline`]: an ordered list of [`SyntaxExtension`]s wrapped
//! around a GitHub Flavored Markdown event walk. Extensions can rewrite
//! source text before parsing, enable extra parser syntax, and rewrite the
//! rendered HTML afterwards.
//!
//! Alongside the HTML, rendering extracts the facts later build stages
//! need: a heading outline, plain-text sections for search indexing,
//! referenced asset paths, and any internal links that failed to resolve
//! through the [`RouteResolver`].
//!
//! # Example
//!
//! ```
//! use imprint_renderer::{RenderContext, RouteResolver, TransformPipeline};
//!
//! struct NoRoutes;
//!
//! impl RouteResolver for NoRoutes {
//!     fn route_for(&self, _source_path: &str) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let mut pipeline = TransformPipeline::with_defaults();
//! let ctx = RenderContext {
//!     source_path: "guide.md",
//!     resolver: &NoRoutes,
//! };
//! let page = pipeline.render_page("# Guide\n\n## Setup\n\nInstall it.", &ctx);
//! assert_eq!(page.outline[0].id, "setup");
//! ```

mod extension;
pub mod extensions;
mod fence;
mod ledger;
mod links;
mod pipeline;
mod renderer;
mod state;

pub use extension::{PipelineError, SyntaxExtension};
pub use extensions::{
    Abbreviations, DEFAULT_EXTENSIONS, DefinitionLists, Footnotes, Typography,
};
pub use links::RouteResolver;
pub use pipeline::TransformPipeline;
pub use renderer::{RenderContext, RenderedPage};
pub use state::{OutlineEntry, Section, escape_html, slugify};
