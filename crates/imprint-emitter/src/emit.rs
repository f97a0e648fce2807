//! Staged, atomic site emission.
//!
//! [`emit`] writes the complete artifact set into a hidden staging
//! directory next to the output, then swaps it into place with two
//! renames. Readers of the output directory see either the previous
//! site or the new one, never a half-written tree, and any failure
//! before the swap leaves the previous site untouched.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;

use imprint_renderer::escape_html;
use imprint_runtime::{RUNTIME_JS, payload_path};
use imprint_search::SearchIndex;
use imprint_site::CompiledSite;
use imprint_storage::Store;

use crate::error::EmitError;
use crate::payload::PagePayload;
use crate::shell::{ShellOptions, render_shell};

/// Placeholder image served for assets referenced but absent from the store.
const MISSING_SVG: &str = include_str!("../assets/missing.svg");

/// Options for one emission pass.
#[derive(Clone, Debug)]
pub struct EmitOptions {
    /// Directory the published site ends up in.
    pub output_dir: PathBuf,
    /// Shell presentation options.
    pub shell: ShellOptions,
}

impl EmitOptions {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            shell: ShellOptions::default(),
        }
    }
}

/// Outcome of a successful emission.
#[derive(Debug)]
pub struct EmitReport {
    /// Where the site was published.
    pub output_dir: PathBuf,
    /// Number of files written.
    pub files: usize,
    /// Recoverable problems, reported but not fatal.
    pub warnings: Vec<String>,
}

/// Emit a compiled site and its search index as a static artifact set.
///
/// Writes, per site: `index.html` (the shell), `manifest.json`,
/// `search-index.json`, `payloads/<route>.json` for every page,
/// `assets/runtime.js`, `assets/missing.svg`, and every referenced store
/// asset under `assets/`. A referenced asset missing from the store is a
/// warning; its `<img>` sources are rewritten to the placeholder.
///
/// # Errors
///
/// Returns [`EmitError`] if staging, serialization, an asset read, or
/// the final swap fails. On error the previous output directory, if any,
/// is left in place.
pub fn emit(
    site: &CompiledSite,
    index: &SearchIndex,
    store: &dyn Store,
    options: &EmitOptions,
) -> Result<EmitReport, EmitError> {
    let output = &options.output_dir;
    let parent = staging_parent(output);
    fs::create_dir_all(parent).map_err(|source| EmitError::Stage {
        dir: parent.to_path_buf(),
        source,
    })?;

    // Staging lives next to the output so the swap is a same-filesystem
    // rename. The TempDir guard removes it on any pre-swap failure.
    let staging = tempfile::Builder::new()
        .prefix(".imprint-staging-")
        .tempdir_in(parent)
        .map_err(|source| EmitError::Stage {
            dir: parent.to_path_buf(),
            source,
        })?;

    let mut stage = Stage {
        root: staging.path().to_path_buf(),
        files: 0,
        warnings: Vec::new(),
    };

    let substitutions = stage.copy_assets(site, store)?;
    stage.write_payloads(site, &substitutions)?;
    stage.write_json("manifest.json", &site.manifest)?;
    stage.write_json("search-index.json", index)?;
    let shell = render_shell(&site.manifest.site, &site.manifest.generation, &options.shell);
    stage.write_text("index.html", &shell)?;
    stage.write_text("assets/runtime.js", RUNTIME_JS)?;
    stage.write_text("assets/missing.svg", MISSING_SVG)?;

    let files = stage.files;
    let warnings = stage.warnings;
    swap_into_place(staging, output)?;

    tracing::info!(
        files,
        output = %output.display(),
        generation = %site.manifest.generation,
        "Site published"
    );
    Ok(EmitReport {
        output_dir: output.clone(),
        files,
        warnings,
    })
}

/// Accumulates files under the staging root.
struct Stage {
    root: PathBuf,
    files: usize,
    warnings: Vec<String>,
}

impl Stage {
    fn write_bytes(&mut self, rel: &str, bytes: &[u8]) -> Result<(), EmitError> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| EmitError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, bytes).map_err(|source| EmitError::Write { path, source })?;
        self.files += 1;
        Ok(())
    }

    fn write_text(&mut self, rel: &str, text: &str) -> Result<(), EmitError> {
        self.write_bytes(rel, text.as_bytes())
    }

    /// Compact JSON keeps payloads small and emission byte-deterministic.
    fn write_json<T: Serialize>(&mut self, rel: &str, value: &T) -> Result<(), EmitError> {
        let bytes = serde_json::to_vec(value)?;
        self.write_bytes(rel, &bytes)
    }

    /// Copy every referenced asset under `assets/`.
    ///
    /// Returns the `src` attribute rewrites for assets the store does not
    /// have, applied to payload HTML before it is written.
    fn copy_assets(
        &mut self,
        site: &CompiledSite,
        store: &dyn Store,
    ) -> Result<Vec<(String, String)>, EmitError> {
        let mut substitutions = Vec::new();
        for asset in site.asset_paths() {
            if store.exists(asset) {
                let bytes = store.read_bytes(asset)?;
                self.write_bytes(&format!("assets/{asset}"), &bytes)?;
            } else {
                tracing::warn!(asset, "Referenced asset not found in store");
                self.warnings
                    .push(format!("asset `{asset}` not found, substituting placeholder"));
                substitutions.push((
                    format!("src=\"/assets/{}\"", escape_html(asset)),
                    "src=\"/assets/missing.svg\"".to_owned(),
                ));
            }
        }
        Ok(substitutions)
    }

    fn write_payloads(
        &mut self,
        site: &CompiledSite,
        substitutions: &[(String, String)],
    ) -> Result<(), EmitError> {
        let mut pages: Vec<_> = site.pages.iter().collect();
        pages.sort_by(|a, b| a.route.cmp(&b.route));
        for page in pages {
            let mut payload = PagePayload::new(page, &site.manifest.generation);
            for (from, to) in substitutions {
                if payload.html.contains(from.as_str()) {
                    payload.html = Cow::Owned(payload.html.replace(from.as_str(), to));
                }
            }
            let rel = payload_path(&page.route);
            let bytes = serde_json::to_vec(&payload)?;
            self.write_bytes(&rel, &bytes)?;
        }
        Ok(())
    }
}

/// Publish the staged tree over the output directory.
///
/// The previous output is renamed aside before the staged tree takes its
/// place; if that second rename fails the aside copy is restored, so a
/// failed publish still leaves a complete site behind.
fn swap_into_place(staging: TempDir, output: &Path) -> Result<(), EmitError> {
    let mut aside = output.as_os_str().to_owned();
    aside.push(".old");
    let aside = PathBuf::from(aside);

    // Left behind if an earlier run died mid-swap.
    if aside.exists() {
        fs::remove_dir_all(&aside).map_err(|source| publish_err(output, source))?;
    }

    let had_previous = output.exists();
    if had_previous {
        fs::rename(output, &aside).map_err(|source| publish_err(output, source))?;
    }

    let staged = staging.keep();
    if let Err(source) = fs::rename(&staged, output) {
        let _ = fs::remove_dir_all(&staged);
        if had_previous {
            let _ = fs::rename(&aside, output);
        }
        return Err(publish_err(output, source));
    }

    if had_previous {
        if let Err(source) = fs::remove_dir_all(&aside) {
            tracing::warn!(path = %aside.display(), error = %source, "Failed to remove replaced site");
        }
    }
    Ok(())
}

fn publish_err(output: &Path, source: io::Error) -> EmitError {
    EmitError::Publish {
        output: output.to_path_buf(),
        source,
    }
}

/// Directory the staging tempdir is created in.
fn staging_parent(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use imprint_site::{CompileOptions, compile};
    use imprint_storage::{MemoryStore, StoreError, StoreErrorKind};

    use super::*;

    fn fixture_store() -> MemoryStore {
        MemoryStore::new()
            .with_file(
                "index.md",
                "# Home\n\nWelcome to the [guide](01-guide/index.md).",
            )
            .with_file("01-guide/index.md", "# Guide\n\n![diagram](/img/flow.png)")
            .with_file(
                "01-guide/01-install.md",
                "---\ntitle: Install\n---\n\nDownload the binary.",
            )
            .with_bytes("img/flow.png", *b"\x89PNG")
    }

    fn compiled(store: &MemoryStore) -> (CompiledSite, SearchIndex) {
        let site = compile(store, &CompileOptions::default()).unwrap();
        let pages = site
            .pages
            .iter()
            .filter(|page| !page.hidden)
            .map(|page| (page.route.as_str(), page.sections.as_slice()));
        let index = SearchIndex::build(&site.manifest.generation, pages);
        (site, index)
    }

    fn list_files(root: &Path) -> Vec<String> {
        fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(base, &path, out);
                } else {
                    let rel = path.strip_prefix(base).unwrap();
                    out.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        let mut out = Vec::new();
        walk(root, root, &mut out);
        out.sort();
        out
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_emit_writes_complete_artifact_set() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));

        let report = emit(&site, &index, &store, &options).unwrap();

        assert_eq!(
            list_files(&options.output_dir),
            [
                "assets/img/flow.png",
                "assets/missing.svg",
                "assets/runtime.js",
                "index.html",
                "manifest.json",
                "payloads/guide.json",
                "payloads/guide/install.json",
                "payloads/index.json",
                "search-index.json",
            ]
        );
        assert_eq!(report.files, 9);
        assert_eq!(report.warnings, Vec::<String>::new());
    }

    #[test]
    fn test_root_payload_lands_at_payloads_index() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));

        emit(&site, &index, &store, &options).unwrap();

        let payload = read_json(&options.output_dir.join("payloads/index.json"));
        assert_eq!(payload["route"], "");
        assert_eq!(payload["title"], "Home");
    }

    #[test]
    fn test_payload_carries_links_and_generation() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));

        emit(&site, &index, &store, &options).unwrap();

        let payload = read_json(&options.output_dir.join("payloads/guide/install.json"));
        assert_eq!(payload["prev"]["route"], "guide");
        assert_eq!(payload["prev"]["title"], "Guide");
        assert_eq!(
            payload["generation"].as_str().unwrap(),
            site.manifest.generation
        );
        let manifest = read_json(&options.output_dir.join("manifest.json"));
        assert_eq!(payload["generation"], manifest["generation"]);
    }

    #[test]
    fn test_cross_reference_resolves_to_route_href() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));

        emit(&site, &index, &store, &options).unwrap();

        let payload = read_json(&options.output_dir.join("payloads/index.json"));
        let html = payload["html"].as_str().unwrap();
        assert!(html.contains("href=\"/guide\""), "html: {html}");
    }

    #[test]
    fn test_missing_asset_substitutes_placeholder() {
        let store = MemoryStore::new()
            .with_file("index.md", "# Home\n\n![gone](/img/lost.png)");
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));

        let report = emit(&site, &index, &store, &options).unwrap();

        assert_eq!(
            report.warnings,
            ["asset `img/lost.png` not found, substituting placeholder"]
        );
        let payload = read_json(&options.output_dir.join("payloads/index.json"));
        let html = payload["html"].as_str().unwrap();
        assert!(html.contains("src=\"/assets/missing.svg\""), "html: {html}");
        assert!(!html.contains("lost.png"), "html: {html}");
        assert!(options.output_dir.join("assets/missing.svg").exists());
        assert!(!options.output_dir.join("assets/img/lost.png").exists());
    }

    #[test]
    fn test_emit_is_deterministic() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let first = EmitOptions::new(out.path().join("a"));
        let second = EmitOptions::new(out.path().join("b"));

        emit(&site, &index, &store, &first).unwrap();
        emit(&site, &index, &store, &second).unwrap();

        for rel in ["manifest.json", "search-index.json", "payloads/guide.json", "index.html"] {
            assert_eq!(
                fs::read(first.output_dir.join(rel)).unwrap(),
                fs::read(second.output_dir.join(rel)).unwrap(),
                "artifact {rel} differs between passes"
            );
        }
    }

    #[test]
    fn test_emit_replaces_previous_site_atomically() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));
        fs::create_dir_all(&options.output_dir).unwrap();
        fs::write(options.output_dir.join("stale.html"), "old").unwrap();

        emit(&site, &index, &store, &options).unwrap();

        assert!(!options.output_dir.join("stale.html").exists());
        assert!(options.output_dir.join("index.html").exists());
        // No staging or aside directories left next to the output.
        let mut siblings: Vec<_> = fs::read_dir(out.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        siblings.sort();
        assert_eq!(siblings, ["dist"]);
    }

    /// Store whose assets exist but cannot be read.
    struct BrokenAssets(MemoryStore);

    impl Store for BrokenAssets {
        fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
            self.0.scan(pattern)
        }
        fn read(&self, path: &str) -> Result<String, StoreError> {
            self.0.read(path)
        }
        fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
            Err(StoreError::new(StoreErrorKind::PermissionDenied).with_path(path))
        }
        fn exists(&self, path: &str) -> bool {
            self.0.exists(path)
        }
        fn mtime(&self, path: &str) -> Result<u64, StoreError> {
            self.0.mtime(path)
        }
    }

    #[test]
    fn test_failed_emit_preserves_previous_site() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));
        emit(&site, &index, &store, &options).unwrap();
        let published = fs::read(options.output_dir.join("manifest.json")).unwrap();

        let broken = BrokenAssets(store);
        let err = emit(&site, &index, &broken, &options).unwrap_err();

        assert!(matches!(err, EmitError::Store(_)), "got {err:?}");
        assert_eq!(
            fs::read(options.output_dir.join("manifest.json")).unwrap(),
            published
        );
        let mut siblings: Vec<_> = fs::read_dir(out.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        siblings.sort();
        assert_eq!(siblings, ["dist"]);
    }

    #[test]
    fn test_emit_creates_nested_output_dir() {
        let store = fixture_store();
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("sites/docs/dist"));

        emit(&site, &index, &store, &options).unwrap();

        assert!(options.output_dir.join("index.html").exists());
    }

    #[test]
    fn test_hidden_page_gets_payload_but_no_search_entry() {
        let store = MemoryStore::new()
            .with_file("index.md", "# Home\n\nHello.")
            .with_file(
                "notes.md",
                "---\ntitle: Notes\nhidden: true\n---\n\nXyzzy content.",
            );
        let (site, index) = compiled(&store);
        let out = tempfile::tempdir().unwrap();
        let options = EmitOptions::new(out.path().join("dist"));

        emit(&site, &index, &store, &options).unwrap();

        let payload = read_json(&options.output_dir.join("payloads/notes.json"));
        assert_eq!(payload["title"], "Notes");
        let search = read_json(&options.output_dir.join("search-index.json"));
        assert!(search["entries"].get("xyzzy").is_none());
        let manifest = read_json(&options.output_dir.join("manifest.json"));
        assert_eq!(manifest["routes"]["notes"]["hidden"], true);
    }
}
