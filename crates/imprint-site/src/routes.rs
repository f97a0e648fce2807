//! Canonical route derivation and the route table.
//!
//! Every document gets exactly one route, derived from its store path:
//! each path segment loses its numeric ordering prefix (`NN-`, `NN_`,
//! `NN `) and is slugified; an `index` basename maps to its directory's
//! route, and the root `index.md` maps to the empty route (served at `/`).
//!
//! [`RouteTable`] holds the source-path ↔ route mapping for a build and
//! rejects collisions at insert time. It implements
//! [`RouteResolver`] so the renderer can rewrite
//! cross-document links to canonical routes.

use std::collections::{BTreeMap, HashMap};

use imprint_renderer::RouteResolver;
use regex::Regex;

use crate::error::SiteError;

/// Splits a numeric ordering prefix off a path segment.
///
/// Recognizes `NN-name`, `NN_name`, and `NN name`. The prefix orders
/// siblings in the navigation tree and is stripped from display text
/// and routes.
pub(crate) struct PrefixSplitter {
    pattern: Regex,
}

impl PrefixSplitter {
    pub(crate) fn new() -> Self {
        Self {
            pattern: Regex::new(r"^(\d+)[-_ ](.+)$").unwrap(),
        }
    }

    /// Split `segment` into its numeric prefix and remaining text.
    ///
    /// Segments without a prefix (or with a number too large for `u32`)
    /// come back unchanged.
    pub(crate) fn split<'a>(&self, segment: &'a str) -> (Option<u32>, &'a str) {
        if let Some(caps) = self.pattern.captures(segment)
            && let (Some(number), Some(rest)) = (caps.get(1), caps.get(2))
            && let Ok(number) = number.as_str().parse::<u32>()
        {
            return (Some(number), rest.as_str());
        }
        (None, segment)
    }
}

/// Source-path ↔ canonical-route mapping for one build.
///
/// Routes are derived on [`insert`](RouteTable::insert); a second document
/// resolving to an already-claimed route is a fatal
/// [`SiteError::RouteCollision`] naming both sources.
pub struct RouteTable {
    prefix: PrefixSplitter,
    by_source: HashMap<String, String>,
    by_route: BTreeMap<String, String>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: PrefixSplitter::new(),
            by_source: HashMap::new(),
            by_route: BTreeMap::new(),
        }
    }

    /// Derive the canonical route for `source_path` and claim it.
    ///
    /// Returns the derived route.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::RouteCollision`] if another document already
    /// claimed the same route.
    pub fn insert(&mut self, source_path: &str) -> Result<String, SiteError> {
        let route = self.derive(source_path);
        if let Some(existing) = self.by_route.get(&route) {
            return Err(SiteError::RouteCollision {
                route,
                first: existing.clone(),
                second: source_path.to_owned(),
            });
        }
        self.by_route.insert(route.clone(), source_path.to_owned());
        self.by_source
            .insert(source_path.to_owned(), route.clone());
        Ok(route)
    }

    /// Derive the canonical route for a store path without claiming it.
    #[must_use]
    pub fn derive(&self, source_path: &str) -> String {
        let trimmed = source_path.strip_suffix(".md").unwrap_or(source_path);
        let mut segments: Vec<&str> = trimmed.split('/').collect();

        // An index basename maps to its directory's route; the root
        // index.md maps to the empty route.
        if let Some(last) = segments.last() {
            let (_, name) = self.prefix.split(last);
            if name == "index" {
                segments.pop();
            }
        }

        segments
            .iter()
            .map(|segment| {
                let (_, rest) = self.prefix.split(segment);
                slug::slugify(rest)
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Look up the route for a store path.
    #[must_use]
    pub fn route_for_source(&self, source_path: &str) -> Option<&str> {
        self.by_source.get(source_path).map(String::as_str)
    }

    /// Look up the store path that claimed a route.
    #[must_use]
    pub fn source_for_route(&self, route: &str) -> Option<&str> {
        self.by_route.get(route).map(String::as_str)
    }

    /// Iterate `(route, source_path)` pairs in route order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_route
            .iter()
            .map(|(route, source)| (route.as_str(), source.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_route.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_route.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteResolver for RouteTable {
    fn route_for(&self, source_path: &str) -> Option<String> {
        self.by_source.get(source_path).cloned()
    }
}
