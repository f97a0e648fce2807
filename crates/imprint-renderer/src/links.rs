//! Internal link and asset resolution.
//!
//! Markdown links between documents are written as relative `.md` paths.
//! During rendering they are resolved through a [`RouteResolver`] to the
//! canonical route of the target document, so emitted HTML never exposes
//! source paths. Image references resolve to store-relative asset paths
//! for the emitter to copy.

/// Route lookup for internal links.
///
/// Implemented by the site builder over its route table.
pub trait RouteResolver {
    /// Map a store-relative source path (e.g. `guides/setup.md`) to the
    /// route of the document it produces.
    fn route_for(&self, source_path: &str) -> Option<String>;
}

/// Outcome of resolving a link destination.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LinkTarget {
    /// External, fragment-only, or non-markdown link; use the URL as-is.
    Unchanged,
    /// Internal markdown link resolved to a route href.
    Route(String),
    /// Internal markdown link whose target is not in the store.
    ///
    /// Carries the normalized store-relative path that failed to resolve.
    Broken(String),
}

/// Resolve a markdown link destination against the current document.
///
/// `source_dir` is the store-relative directory of the document being
/// rendered (empty at the store root). External links, fragment-only
/// links, and non-markdown links pass through unchanged.
#[allow(clippy::case_sensitive_file_extension_comparisons)]
pub(crate) fn resolve_md_link(
    url: &str,
    source_dir: &str,
    resolver: &dyn RouteResolver,
) -> LinkTarget {
    if is_external(url) || url.starts_with('#') {
        return LinkTarget::Unchanged;
    }

    if !url.ends_with(".md") && !url.contains(".md#") {
        return LinkTarget::Unchanged;
    }

    let (path_part, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], Some(&url[pos..])),
        None => (url, None),
    };

    // Leading slash addresses the store root; everything else is relative
    // to the current document's directory
    let normalized = if let Some(rooted) = path_part.strip_prefix('/') {
        rooted.to_owned()
    } else {
        resolve_relative_path(path_part, source_dir)
    };

    match resolver.route_for(&normalized) {
        Some(route) => {
            let mut href = route_href(&route);
            if let Some(frag) = fragment {
                href.push_str(frag);
            }
            LinkTarget::Route(href)
        }
        None => LinkTarget::Broken(normalized),
    }
}

/// Resolve an image source to a store-relative asset path.
///
/// Returns `None` for external sources and data URIs, which are embedded
/// as written.
pub(crate) fn resolve_asset_path(src: &str, source_dir: &str) -> Option<String> {
    if is_external(src) || src.starts_with("data:") || src.starts_with('#') {
        return None;
    }

    let path = src.strip_prefix('/').map_or_else(
        || resolve_relative_path(src, source_dir),
        std::borrow::ToOwned::to_owned,
    );
    Some(path)
}

/// Build the href for a route, where the empty route is the site root.
pub(crate) fn route_href(route: &str) -> String {
    if route.is_empty() {
        "/".to_owned()
    } else {
        format!("/{route}")
    }
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
}

/// Resolve a relative path against a base directory.
///
/// Handles `.` (current), `..` (parent), and plain relative segments.
/// Traversal above the store root is clamped.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}
