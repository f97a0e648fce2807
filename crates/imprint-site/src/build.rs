//! The build pass: scan, extract, route, render.
//!
//! [`compile`] runs the whole document-to-site pipeline against a store:
//!
//! 1. scan for markdown documents (sorted, deterministic),
//! 2. load each document and extract metadata (fatal on malformed
//!    front-matter),
//! 3. derive canonical routes (fatal on collision),
//! 4. build the navigation tree and resolve prev/next links (the
//!    single-threaded barrier every later stage depends on),
//! 5. render document bodies in parallel with rayon.
//!
//! Rendering shares no mutable state across documents; each worker builds
//! its own [`TransformPipeline`] from the configured extension names.
//! Recoverable problems are collected into [`CompiledSite::warnings`] and
//! reported in aggregate; any fatal error aborts the pass.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use imprint_renderer::{
    DEFAULT_EXTENSIONS, OutlineEntry, RenderContext, Section, TransformPipeline,
};
use imprint_storage::{Document, Store};

use crate::error::SiteError;
use crate::manifest::{BuildManifest, SiteInfo};
use crate::metadata::{DocRecord, MetadataExtractor};
use crate::nav::{NavLink, NavTree, PageLinks, resolve_links};
use crate::routes::RouteTable;

/// Options for one build pass.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Site identity carried into the manifest.
    pub site: SiteInfo,
    /// Ordered syntax extension names for the transform pipeline.
    pub extensions: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// One fully rendered page with its payload metadata.
#[derive(Clone, Debug)]
pub struct CompiledPage {
    /// Canonical route.
    pub route: String,
    /// Store path of the source document.
    pub source_path: String,
    /// Display title.
    pub title: String,
    /// Page description.
    pub description: Option<String>,
    /// Document authors.
    pub authors: Vec<String>,
    /// Search keywords.
    pub keywords: Vec<String>,
    /// Kept out of navigation and search, still served.
    pub hidden: bool,
    /// Rendered HTML body.
    pub html: String,
    /// Heading outline for the in-page table of contents.
    pub outline: Vec<OutlineEntry>,
    /// Plain-text sections for search indexing.
    pub sections: Vec<Section>,
    /// Store paths of referenced assets.
    pub assets: Vec<String>,
    /// Previous document in reading order.
    pub prev: Option<NavLink>,
    /// Next document in reading order.
    pub next: Option<NavLink>,
    /// Source modification time, seconds since the Unix epoch.
    pub modified: u64,
}

/// Output of a successful build pass.
#[derive(Debug)]
pub struct CompiledSite {
    /// The sealed build manifest.
    pub manifest: BuildManifest,
    /// Rendered pages in store enumeration order.
    pub pages: Vec<CompiledPage>,
    /// Recoverable problems, aggregated across all stages.
    pub warnings: Vec<String>,
}

impl CompiledSite {
    /// All referenced asset paths, deduplicated and sorted.
    #[must_use]
    pub fn asset_paths(&self) -> BTreeSet<&str> {
        self.pages
            .iter()
            .flat_map(|page| page.assets.iter().map(String::as_str))
            .collect()
    }
}

/// Compile every document in the store into a site.
///
/// # Errors
///
/// Returns [`SiteError`] on any fatal condition: store failure, malformed
/// front-matter, route collision, unresolved cross-reference, or an
/// unknown extension name.
pub fn compile(store: &dyn Store, options: &CompileOptions) -> Result<CompiledSite, SiteError> {
    let paths = store.scan("**/*.md")?;
    tracing::debug!(document_count = paths.len(), "Store scan completed");

    let extractor = MetadataExtractor::new();
    let mut route_table = RouteTable::new();
    let mut records = Vec::with_capacity(paths.len());
    let mut warnings = Vec::new();

    for path in &paths {
        let document = Document::load(store, path)?;
        let meta = extractor.extract(&document)?;
        if meta.untitled {
            warnings.push(format!(
                "`{path}`: no title in front matter or body, using `{}`",
                meta.title
            ));
        }
        let route = route_table.insert(path)?;
        records.push(DocRecord {
            document,
            route,
            meta,
        });
    }

    let tree = NavTree::build(&records);
    let resolution = resolve_links(&records, tree.reading_order(), &route_table)?;
    warnings.extend(resolution.warnings);

    let manifest = BuildManifest::assemble(
        options.site.clone(),
        &records,
        &tree,
        resolution.links,
    )?;
    tracing::debug!(
        generation = %manifest.generation,
        routes = manifest.routes.len(),
        "Manifest assembled"
    );

    let rendered: Vec<(CompiledPage, Vec<String>)> = records
        .par_iter()
        .map(|record| render_record(record, &route_table, &manifest.links, &options.extensions))
        .collect::<Result<_, _>>()?;

    let mut pages = Vec::with_capacity(rendered.len());
    for (page, page_warnings) in rendered {
        warnings.extend(
            page_warnings
                .iter()
                .map(|warning| format!("`{}`: {warning}", page.source_path)),
        );
        pages.push(page);
    }

    tracing::info!(
        pages = pages.len(),
        warnings = warnings.len(),
        generation = %manifest.generation,
        "Site compiled"
    );

    Ok(CompiledSite {
        manifest,
        pages,
        warnings,
    })
}

fn render_record(
    record: &DocRecord,
    routes: &RouteTable,
    links: &BTreeMap<String, PageLinks>,
    extensions: &[String],
) -> Result<(CompiledPage, Vec<String>), SiteError> {
    let mut pipeline = TransformPipeline::from_names(extensions)?;
    let ctx = RenderContext {
        source_path: &record.document.source_path,
        resolver: routes,
    };
    let rendered = pipeline.render_page(&record.document.body, &ctx);

    if !rendered.broken_links.is_empty() {
        return Err(SiteError::UnresolvedReferences {
            path: record.document.source_path.clone(),
            targets: rendered.broken_links,
        });
    }

    let page_links = links.get(&record.route).cloned().unwrap_or_default();

    let page = CompiledPage {
        route: record.route.clone(),
        source_path: record.document.source_path.clone(),
        title: record.meta.title.clone(),
        description: record.meta.description.clone(),
        authors: record.meta.authors.clone(),
        keywords: record.meta.keywords.clone(),
        hidden: record.meta.hidden,
        html: rendered.html,
        outline: rendered.outline,
        sections: rendered.sections,
        assets: rendered.assets,
        prev: page_links.prev,
        next: page_links.next,
        modified: record.document.modified,
    };
    Ok((page, rendered.warnings))
}
