//! Navigation tree and prev/next link resolution.
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec<NavNode>` with parent/children
//! relationships tracked by indices, so the tree serializes directly into
//! the manifest and never forms reference cycles. Branch nodes come from
//! directories: a directory's `index.md` gives the branch its title and
//! route; without one the branch is a label derived from the segment name.
//!
//! Sibling order is the ordering key ascending (explicit `order`, else
//! numeric path prefix), numbered entries before unnumbered, unnumbered
//! lexical by segment. Ties keep store enumeration order, so rebuilds on
//! identical input produce an identical tree.
//!
//! The flat reading order is a depth-first walk of the sorted tree (the
//! root `index.md` first, branch index pages before their children) and
//! drives prev/next inference for documents without explicit overrides.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::SiteError;
use crate::metadata::{DocRecord, LinkOverride, title_from_name};
use crate::routes::{PrefixSplitter, RouteTable};

/// One entry in the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavNode {
    /// Display title.
    pub title: String,
    /// Canonical route, `None` for label-only branches.
    pub route: Option<String>,
    /// Child node indices, in display order.
    pub children: Vec<usize>,
    /// Parent node index, `None` for roots.
    pub parent: Option<usize>,
    /// Initial collapse state; branches with ordering key `0` start
    /// expanded, every other branch starts collapsed.
    pub collapsed: bool,
}

/// Arena-backed navigation tree plus the flat reading order.
#[derive(Clone, Debug)]
pub struct NavTree {
    nodes: Vec<NavNode>,
    roots: Vec<usize>,
    reading_order: Vec<String>,
}

impl NavTree {
    /// Build the tree from all document records.
    ///
    /// Hidden documents are skipped entirely; the root `index.md` appears
    /// only in the reading order, not as a tree node.
    #[must_use]
    pub fn build(records: &[DocRecord]) -> Self {
        let mut builder = TreeBuilder::new();
        for record in records {
            if record.meta.hidden {
                continue;
            }
            builder.insert(record);
        }
        builder.finish()
    }

    /// All nodes in insertion order; indices in [`NavNode::children`],
    /// [`NavNode::parent`], and [`roots`](NavTree::roots) point here.
    #[must_use]
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// Top-level node indices in display order.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Routes in linear reading order.
    #[must_use]
    pub fn reading_order(&self) -> &[String] {
        &self.reading_order
    }
}

struct TreeBuilder {
    prefix: PrefixSplitter,
    nodes: Vec<NavNode>,
    roots: Vec<usize>,
    /// Declared ordering key per node (explicit `order` or path prefix).
    orderings: Vec<Option<u32>>,
    /// Lexical tie-break key per node (slugified segment).
    sort_keys: Vec<String>,
    /// Directory path → branch node index.
    dir_nodes: HashMap<String, usize>,
    /// Route of the root `index.md`, if present.
    home: Option<String>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            prefix: PrefixSplitter::new(),
            nodes: Vec::new(),
            roots: Vec::new(),
            orderings: Vec::new(),
            sort_keys: Vec::new(),
            dir_nodes: HashMap::new(),
            home: None,
        }
    }

    fn insert(&mut self, record: &DocRecord) {
        let path = &record.document.source_path;
        let segments: Vec<&str> = path.split('/').collect();
        let Some((file, dirs)) = segments.split_last() else {
            return;
        };

        let mut parent = None;
        for (depth, segment) in dirs.iter().enumerate() {
            let dir_path = dirs[..=depth].join("/");
            parent = Some(self.branch_at(&dir_path, segment, parent));
        }

        let name = file.strip_suffix(".md").unwrap_or(file);
        let (file_number, name) = self.prefix.split(name);

        if name == "index" {
            if let Some(idx) = parent {
                // The index document gives the branch its identity.
                self.nodes[idx].title = record.meta.title.clone();
                self.nodes[idx].route = Some(record.route.clone());
                if let Some(order) = record.meta.order {
                    self.orderings[idx] = Some(order);
                }
            } else {
                self.home = Some(record.route.clone());
            }
            return;
        }

        let idx = self.push_node(
            NavNode {
                title: record.meta.title.clone(),
                route: Some(record.route.clone()),
                children: Vec::new(),
                parent,
                collapsed: false,
            },
            record.meta.order.or(file_number),
            slug::slugify(name),
        );
        self.attach(idx, parent);
    }

    /// Get or create the branch node for a directory path.
    fn branch_at(&mut self, dir_path: &str, segment: &str, parent: Option<usize>) -> usize {
        if let Some(&idx) = self.dir_nodes.get(dir_path) {
            return idx;
        }

        let (number, rest) = self.prefix.split(segment);
        let idx = self.push_node(
            NavNode {
                title: title_from_name(rest),
                route: None,
                children: Vec::new(),
                parent,
                collapsed: false,
            },
            number,
            slug::slugify(rest),
        );
        self.attach(idx, parent);
        self.dir_nodes.insert(dir_path.to_owned(), idx);
        idx
    }

    fn push_node(&mut self, node: NavNode, ordering: Option<u32>, sort_key: String) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.orderings.push(ordering);
        self.sort_keys.push(sort_key);
        idx
    }

    fn attach(&mut self, idx: usize, parent: Option<usize>) {
        if let Some(parent) = parent {
            self.nodes[parent].children.push(idx);
        } else {
            self.roots.push(idx);
        }
    }

    fn finish(mut self) -> NavTree {
        // Branches are always created before their children, so walking
        // indices in reverse sorts and resolves each subtree before its
        // parent needs the first child's effective ordering.
        let mut effective = self.orderings.clone();
        for idx in (0..self.nodes.len()).rev() {
            let mut children = std::mem::take(&mut self.nodes[idx].children);
            self.sort_siblings(&mut children, &effective);
            if effective[idx].is_none()
                && let Some(&first) = children.first()
            {
                effective[idx] = effective[first];
            }
            self.nodes[idx].children = children;
        }
        let mut roots = std::mem::take(&mut self.roots);
        self.sort_siblings(&mut roots, &effective);

        for (idx, node) in self.nodes.iter_mut().enumerate() {
            node.collapsed = !node.children.is_empty() && effective[idx] != Some(0);
        }

        let mut reading_order = Vec::new();
        if let Some(home) = self.home.take() {
            reading_order.push(home);
        }
        for &root in &roots {
            collect_reading_order(&self.nodes, root, &mut reading_order);
        }

        NavTree {
            nodes: self.nodes,
            roots,
            reading_order,
        }
    }

    /// Stable sort: ordering key ascending, numbered before unnumbered,
    /// unnumbered lexical by segment. Equal keys keep insertion order,
    /// which is store enumeration order.
    fn sort_siblings(&self, siblings: &mut [usize], effective: &[Option<u32>]) {
        siblings.sort_by(|&a, &b| {
            let key = |i: usize| {
                let lexical = if effective[i].is_none() {
                    self.sort_keys[i].as_str()
                } else {
                    ""
                };
                (effective[i].is_none(), effective[i].unwrap_or(0), lexical)
            };
            key(a).cmp(&key(b))
        });
    }
}

fn collect_reading_order(nodes: &[NavNode], idx: usize, order: &mut Vec<String>) {
    if let Some(route) = &nodes[idx].route {
        order.push(route.clone());
    }
    for &child in &nodes[idx].children {
        collect_reading_order(nodes, child, order);
    }
}

/// A resolved prev/next reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Display title of the target document.
    pub title: String,
    /// Canonical route of the target document.
    pub route: String,
}

/// Prev/next pair for one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Previous document in reading order, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NavLink>,
    /// Next document in reading order, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
}

/// Output of [`resolve_links`].
#[derive(Debug)]
pub struct LinkResolution {
    /// Route → resolved prev/next pair, for every document.
    pub links: BTreeMap<String, PageLinks>,
    /// Asymmetry warnings (never repaired).
    pub warnings: Vec<String>,
}

/// Resolve prev/next links for every document.
///
/// Each document's own declaration is authoritative for its own link:
/// `false` suppresses it, an explicit target pins it, and otherwise the
/// reading-order neighbors are inferred. Detected asymmetry (A lists B as
/// next but B doesn't list A as previous) is reported as a warning and
/// left as declared.
///
/// # Errors
///
/// Returns [`SiteError::UnresolvedOverride`] when an explicit target
/// matches neither a route nor a source path.
pub fn resolve_links(
    records: &[DocRecord],
    reading_order: &[String],
    routes: &RouteTable,
) -> Result<LinkResolution, SiteError> {
    let titles: HashMap<&str, &str> = records
        .iter()
        .map(|record| (record.route.as_str(), record.meta.title.as_str()))
        .collect();
    let position: HashMap<&str, usize> = reading_order
        .iter()
        .enumerate()
        .map(|(idx, route)| (route.as_str(), idx))
        .collect();

    let mut links = BTreeMap::new();
    for record in records {
        let at = position.get(record.route.as_str()).copied();

        let prev = match &record.meta.prev {
            LinkOverride::Suppressed => None,
            LinkOverride::Explicit(target) => Some(resolve_target(record, "prev", target, routes)?),
            LinkOverride::Inferred => at
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| reading_order.get(idx))
                .cloned(),
        };
        let next = match &record.meta.next {
            LinkOverride::Suppressed => None,
            LinkOverride::Explicit(target) => Some(resolve_target(record, "next", target, routes)?),
            LinkOverride::Inferred => at
                .and_then(|idx| reading_order.get(idx + 1))
                .cloned(),
        };

        links.insert(
            record.route.clone(),
            PageLinks {
                prev: prev.as_deref().map(|route| nav_link(&titles, route)),
                next: next.as_deref().map(|route| nav_link(&titles, route)),
            },
        );
    }

    let mut warnings = Vec::new();
    for (route, page_links) in &links {
        if let Some(next) = &page_links.next {
            let reciprocal = links.get(&next.route).and_then(|l| l.prev.as_ref());
            if reciprocal.is_none_or(|link| link.route != *route) {
                tracing::warn!(
                    from = %route_display(route),
                    to = %route_display(&next.route),
                    "Navigation asymmetry"
                );
                warnings.push(format!(
                    "navigation asymmetry: `{}` lists `{}` as next, but `{}` does not list `{}` as previous",
                    route_display(route),
                    route_display(&next.route),
                    route_display(&next.route),
                    route_display(route),
                ));
            }
        }
    }

    Ok(LinkResolution { links, warnings })
}

fn nav_link(titles: &HashMap<&str, &str>, route: &str) -> NavLink {
    NavLink {
        title: titles.get(route).copied().unwrap_or_default().to_owned(),
        route: route.to_owned(),
    }
}

fn resolve_target(
    record: &DocRecord,
    key: &'static str,
    target: &str,
    routes: &RouteTable,
) -> Result<String, SiteError> {
    let normalized = target.trim_start_matches('/');
    if routes.source_for_route(normalized).is_some() {
        return Ok(normalized.to_owned());
    }
    if let Some(route) = routes.route_for_source(normalized) {
        return Ok(route.to_owned());
    }
    Err(SiteError::UnresolvedOverride {
        path: record.document.source_path.clone(),
        key,
        target: target.to_owned(),
    })
}

fn route_display(route: &str) -> String {
    format!("/{route}")
}

#[cfg(test)]
mod tests {
    use imprint_storage::Document;
    use pretty_assertions::assert_eq;

    use crate::metadata::PageMetadata;

    use super::*;

    fn meta(title: &str) -> PageMetadata {
        PageMetadata {
            title: title.to_owned(),
            untitled: false,
            description: None,
            authors: Vec::new(),
            keywords: Vec::new(),
            order: None,
            prev: LinkOverride::Inferred,
            next: LinkOverride::Inferred,
            hidden: false,
        }
    }

    fn record(path: &str, title: &str) -> DocRecord {
        let route = RouteTable::new().derive(path);
        DocRecord {
            document: Document {
                source_path: path.to_owned(),
                front_matter: None,
                body: String::new(),
                modified: 0,
            },
            route,
            meta: meta(title),
        }
    }

    fn records(paths: &[(&str, &str)]) -> Vec<DocRecord> {
        paths
            .iter()
            .map(|(path, title)| record(path, title))
            .collect()
    }

    fn table(recs: &[DocRecord]) -> RouteTable {
        let mut table = RouteTable::new();
        for rec in recs {
            table.insert(&rec.document.source_path).unwrap();
        }
        table
    }

    fn node_titles(tree: &NavTree, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&idx| tree.nodes()[idx].title.clone())
            .collect()
    }

    // Tree shape

    #[test]
    fn test_tree_groups_by_directory() {
        let recs = records(&[
            ("01-basics/01-install.md", "Install"),
            ("01-basics/02-config.md", "Config"),
            ("01-basics/index.md", "Basics"),
            ("02-advanced/01-tuning.md", "Tuning"),
            ("02-advanced/index.md", "Advanced"),
            ("index.md", "Home"),
        ]);

        let tree = NavTree::build(&recs);

        assert_eq!(node_titles(&tree, tree.roots()), vec!["Basics", "Advanced"]);
        let basics = tree.roots()[0];
        assert_eq!(
            node_titles(&tree, &tree.nodes()[basics].children),
            vec!["Install", "Config"]
        );
        assert_eq!(tree.nodes()[basics].route.as_deref(), Some("basics"));
    }

    #[test]
    fn test_branch_without_index_is_label_only() {
        let recs = records(&[("01-deep-topics/page.md", "Page")]);

        let tree = NavTree::build(&recs);

        let branch = &tree.nodes()[tree.roots()[0]];
        assert_eq!(branch.title, "Deep Topics");
        assert_eq!(branch.route, None);
        assert_eq!(branch.children.len(), 1);
    }

    #[test]
    fn test_root_index_is_not_a_tree_node() {
        let recs = records(&[("index.md", "Home"), ("guide.md", "Guide")]);

        let tree = NavTree::build(&recs);

        assert_eq!(node_titles(&tree, tree.roots()), vec!["Guide"]);
        assert_eq!(tree.reading_order(), ["", "guide"]);
    }

    #[test]
    fn test_hidden_documents_are_skipped() {
        let mut recs = records(&[("a.md", "A"), ("b.md", "B")]);
        recs[1].meta.hidden = true;

        let tree = NavTree::build(&recs);

        assert_eq!(node_titles(&tree, tree.roots()), vec!["A"]);
        assert_eq!(tree.reading_order(), ["a"]);
    }

    // Sibling ordering

    #[test]
    fn test_numbered_siblings_sort_by_prefix() {
        let recs = records(&[
            ("10-last.md", "Last"),
            ("2-second.md", "Second"),
            ("01-first.md", "First"),
        ]);

        let tree = NavTree::build(&recs);

        assert_eq!(
            node_titles(&tree, tree.roots()),
            vec!["First", "Second", "Last"]
        );
    }

    #[test]
    fn test_numbered_before_unnumbered() {
        let recs = records(&[
            ("appendix.md", "Appendix"),
            ("05-guide.md", "Guide"),
            ("changelog.md", "Changelog"),
        ]);

        let tree = NavTree::build(&recs);

        assert_eq!(
            node_titles(&tree, tree.roots()),
            vec!["Guide", "Appendix", "Changelog"]
        );
    }

    #[test]
    fn test_explicit_order_beats_filename_prefix() {
        let mut recs = records(&[("01-first.md", "First"), ("02-second.md", "Second")]);
        recs[1].meta.order = Some(0);

        let tree = NavTree::build(&recs);

        assert_eq!(node_titles(&tree, tree.roots()), vec!["Second", "First"]);
    }

    #[test]
    fn test_equal_orderings_keep_store_order() {
        let mut recs = records(&[("b.md", "B"), ("a.md", "A")]);
        recs[0].meta.order = Some(1);
        recs[1].meta.order = Some(1);

        let tree = NavTree::build(&recs);

        // Store enumeration order decides the tie.
        assert_eq!(node_titles(&tree, tree.roots()), vec!["B", "A"]);
    }

    #[test]
    fn test_branch_inherits_first_child_ordering() {
        let recs = records(&[
            ("zebra/03-note.md", "Note"),
            ("01-intro.md", "Intro"),
            ("05-setup.md", "Setup"),
        ]);

        let tree = NavTree::build(&recs);

        // The zebra branch has no prefix of its own, so it takes its
        // first child's key (3) and lands between intro and setup.
        assert_eq!(
            node_titles(&tree, tree.roots()),
            vec!["Intro", "Zebra", "Setup"]
        );
    }

    #[test]
    fn test_index_explicit_order_beats_directory_prefix() {
        let mut recs = records(&[
            ("01-first/index.md", "First"),
            ("02-second/index.md", "Second"),
        ]);
        recs[1].meta.order = Some(0);

        let tree = NavTree::build(&recs);

        assert_eq!(node_titles(&tree, tree.roots()), vec!["Second", "First"]);
    }

    // Collapse state

    #[test]
    fn test_zero_prefixed_branch_starts_expanded() {
        let recs = records(&[
            ("00-intro/a.md", "A"),
            ("01-guides/b.md", "B"),
        ]);

        let tree = NavTree::build(&recs);

        let intro = &tree.nodes()[tree.roots()[0]];
        let guides = &tree.nodes()[tree.roots()[1]];
        assert!(!intro.collapsed, "00-prefixed branch should start expanded");
        assert!(guides.collapsed);
    }

    #[test]
    fn test_leaves_are_never_collapsed() {
        let recs = records(&[("01-guides/b.md", "B")]);

        let tree = NavTree::build(&recs);

        let branch = &tree.nodes()[tree.roots()[0]];
        let leaf = &tree.nodes()[branch.children[0]];
        assert!(!leaf.collapsed);
    }

    // Reading order

    #[test]
    fn test_reading_order_is_depth_first() {
        let recs = records(&[
            ("01-basics/01-install.md", "Install"),
            ("01-basics/index.md", "Basics"),
            ("02-advanced/01-tuning.md", "Tuning"),
            ("index.md", "Home"),
        ]);

        let tree = NavTree::build(&recs);

        assert_eq!(
            tree.reading_order(),
            ["", "basics", "basics/install", "advanced/tuning"]
        );
    }

    // Link resolution

    #[test]
    fn test_inferred_chain_follows_reading_order() {
        let recs = records(&[("01-intro.md", "Intro"), ("02-body.md", "Body")]);
        let routes = table(&recs);
        let tree = NavTree::build(&recs);

        let resolution = resolve_links(&recs, tree.reading_order(), &routes).unwrap();

        let intro = &resolution.links["intro"];
        let body = &resolution.links["body"];
        assert_eq!(intro.prev, None);
        assert_eq!(intro.next.as_ref().map(|l| l.route.as_str()), Some("body"));
        assert_eq!(body.prev.as_ref().map(|l| l.route.as_str()), Some("intro"));
        assert_eq!(body.next, None);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_suppressed_next_wins_over_inference() {
        let mut recs = records(&[("01-intro.md", "Intro"), ("02-body.md", "Body")]);
        recs[0].meta.next = LinkOverride::Suppressed;
        let routes = table(&recs);
        let tree = NavTree::build(&recs);

        let resolution = resolve_links(&recs, tree.reading_order(), &routes).unwrap();

        assert_eq!(resolution.links["intro"].next, None);
        // The reverse inferred link stays as declared.
        assert_eq!(
            resolution.links["body"].prev.as_ref().map(|l| l.route.as_str()),
            Some("intro")
        );
    }

    #[test]
    fn test_explicit_next_resolves_route_and_source_forms() {
        let mut recs = records(&[
            ("01-intro.md", "Intro"),
            ("02-body.md", "Body"),
            ("03-end.md", "End"),
        ]);
        recs[0].meta.next = LinkOverride::Explicit("/end".to_owned());
        recs[2].meta.prev = LinkOverride::Explicit("01-intro.md".to_owned());
        let routes = table(&recs);
        let tree = NavTree::build(&recs);

        let resolution = resolve_links(&recs, tree.reading_order(), &routes).unwrap();

        assert_eq!(
            resolution.links["intro"].next,
            Some(NavLink {
                title: "End".to_owned(),
                route: "end".to_owned()
            })
        );
        assert_eq!(
            resolution.links["end"].prev.as_ref().map(|l| l.route.as_str()),
            Some("intro")
        );
    }

    #[test]
    fn test_unresolved_explicit_target_is_fatal() {
        let mut recs = records(&[("01-intro.md", "Intro")]);
        recs[0].meta.next = LinkOverride::Explicit("nowhere".to_owned());
        let routes = table(&recs);
        let tree = NavTree::build(&recs);

        let err = resolve_links(&recs, tree.reading_order(), &routes).unwrap_err();

        assert!(matches!(
            err,
            SiteError::UnresolvedOverride { key: "next", .. }
        ));
        assert!(err.to_string().contains("01-intro.md"));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_asymmetry_is_warned_not_repaired() {
        let mut recs = records(&[
            ("01-intro.md", "Intro"),
            ("02-body.md", "Body"),
            ("03-end.md", "End"),
        ]);
        // Intro pins its next to end, but end's prev stays inferred (body).
        recs[0].meta.next = LinkOverride::Explicit("end".to_owned());
        let routes = table(&recs);
        let tree = NavTree::build(&recs);

        let resolution = resolve_links(&recs, tree.reading_order(), &routes).unwrap();

        assert_eq!(
            resolution.links["intro"].next.as_ref().map(|l| l.route.as_str()),
            Some("end")
        );
        assert_eq!(
            resolution.links["end"].prev.as_ref().map(|l| l.route.as_str()),
            Some("body")
        );
        assert_eq!(resolution.warnings.len(), 1);
        assert!(resolution.warnings[0].contains("/intro"));
        assert!(resolution.warnings[0].contains("/end"));
    }

    #[test]
    fn test_hidden_documents_get_no_inferred_links() {
        let mut recs = records(&[("a.md", "A"), ("b.md", "B"), ("c.md", "C")]);
        recs[1].meta.hidden = true;
        let routes = table(&recs);
        let tree = NavTree::build(&recs);

        let resolution = resolve_links(&recs, tree.reading_order(), &routes).unwrap();

        // The hidden document is skipped in the chain but keeps an entry.
        assert_eq!(resolution.links["b"], PageLinks::default());
        assert_eq!(
            resolution.links["a"].next.as_ref().map(|l| l.route.as_str()),
            Some("c")
        );
    }

    #[test]
    fn test_nav_tree_is_send_sync() {
        static_assertions::assert_impl_all!(NavTree: Send, Sync);
    }
}
