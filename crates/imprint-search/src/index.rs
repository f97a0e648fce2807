//! Term-to-location index over rendered page sections.

use std::collections::{BTreeMap, HashMap};

use imprint_renderer::Section;
use serde::{Deserialize, Serialize};

use crate::tokenize::tokenize;

/// Bumped whenever the serialized index layout changes.
pub const SEARCH_SCHEMA_VERSION: u32 = 1;

const HEADING_WEIGHT: u8 = 2;
const BODY_WEIGHT: u8 = 1;

/// One occurrence of a term: a route (by index into
/// [`SearchIndex::routes`]) plus the nearest heading anchor.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Posting {
    pub route_idx: usize,
    /// Anchor of the enclosing section, empty for preamble text.
    pub anchor: String,
    /// 2 for heading text, 1 for body text.
    pub weight: u8,
}

/// Frozen search index, serialized as `search-index.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub schema_version: u32,
    /// Generation identifier of the build this index belongs to.
    pub generation: String,
    /// Sorted, deduplicated route table postings point into.
    pub routes: Vec<String>,
    pub entries: BTreeMap<String, Vec<Posting>>,
}

impl SearchIndex {
    /// Build an index over `(route, sections)` pairs in one pass.
    pub fn build<'a, I>(generation: &str, pages: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Section])>,
    {
        let mut builder = IndexBuilder::new();
        for (route, sections) in pages {
            builder.add_page(route, sections);
        }
        builder.finish(generation)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates page sections, then freezes them into a [`SearchIndex`].
///
/// Routes are interned as they arrive and re-sorted when the index is
/// frozen, so insertion order never leaks into the artifact.
#[derive(Default)]
pub struct IndexBuilder {
    routes: Vec<String>,
    route_ids: HashMap<String, usize>,
    terms: HashMap<String, HashMap<(usize, String), u8>>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every section of one page. Heading text weighs 2, body text
    /// weighs 1; a term occurring as both in the same section keeps the
    /// heading weight.
    pub fn add_page(&mut self, route: &str, sections: &[Section]) {
        let route_idx = self.intern(route);
        for section in sections {
            self.add_text(route_idx, &section.anchor, &section.heading, HEADING_WEIGHT);
            self.add_text(route_idx, &section.anchor, &section.body, BODY_WEIGHT);
        }
    }

    /// Freeze the accumulated postings into a [`SearchIndex`] stamped with
    /// the build's generation identifier.
    pub fn finish(self, generation: impl Into<String>) -> SearchIndex {
        let mut indexed: Vec<(String, usize)> = self
            .routes
            .into_iter()
            .enumerate()
            .map(|(idx, route)| (route, idx))
            .collect();
        indexed.sort();

        let mut remap = vec![0; indexed.len()];
        let mut routes = Vec::with_capacity(indexed.len());
        for (sorted_idx, (route, original)) in indexed.into_iter().enumerate() {
            remap[original] = sorted_idx;
            routes.push(route);
        }

        let mut entries = BTreeMap::new();
        for (term, locations) in self.terms {
            let mut postings: Vec<Posting> = locations
                .into_iter()
                .map(|((route_idx, anchor), weight)| Posting {
                    route_idx: remap[route_idx],
                    anchor,
                    weight,
                })
                .collect();
            postings.sort();
            entries.insert(term, postings);
        }

        let index = SearchIndex {
            schema_version: SEARCH_SCHEMA_VERSION,
            generation: generation.into(),
            routes,
            entries,
        };
        tracing::debug!(
            terms = index.entries.len(),
            routes = index.routes.len(),
            "Search index built"
        );
        index
    }

    fn intern(&mut self, route: &str) -> usize {
        if let Some(&idx) = self.route_ids.get(route) {
            return idx;
        }
        let idx = self.routes.len();
        self.routes.push(route.to_owned());
        self.route_ids.insert(route.to_owned(), idx);
        idx
    }

    fn add_text(&mut self, route_idx: usize, anchor: &str, text: &str, weight: u8) {
        for term in tokenize(text) {
            let locations = self.terms.entry(term).or_default();
            locations
                .entry((route_idx, anchor.to_owned()))
                .and_modify(|w| *w = (*w).max(weight))
                .or_insert(weight);
        }
    }
}
