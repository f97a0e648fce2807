//! The serialized build manifest.
//!
//! One manifest is emitted per build. It carries everything the client
//! shell needs to route and render navigation: the route list, the
//! navigation tree (arena-serialized), and the prev/next link table.
//! All maps are `BTreeMap` and all vectors are deterministically ordered,
//! so rebuilding from unchanged input reproduces the manifest byte for
//! byte, including the content-addressed generation identifier.

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::SiteError;
use crate::metadata::DocRecord;
use crate::nav::{NavTree, PageLinks};

/// Bumped when the manifest layout changes incompatibly.
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Site identity carried into the manifest and page payloads.
#[derive(Clone, Debug, Serialize)]
pub struct SiteInfo {
    /// Site title shown in the shell.
    pub title: String,
    /// Site description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External navigation links not backed by a document.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ExternalLink>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            description: None,
            links: Vec::new(),
        }
    }
}

/// A navigation entry pointing outside the document store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExternalLink {
    /// Display label.
    pub label: String,
    /// Absolute URL.
    pub url: String,
}

/// Per-route manifest entry.
#[derive(Clone, Debug, Serialize)]
pub struct RouteEntry {
    /// Display title.
    pub title: String,
    /// Hidden documents are served but kept out of navigation.
    #[serde(skip_serializing_if = "is_false")]
    pub hidden: bool,
}

/// One serialized navigation node; children reference sibling entries
/// by index into the `nav` array.
#[derive(Clone, Debug, Serialize)]
pub struct NavEntry {
    /// Display title.
    pub title: String,
    /// Canonical route, absent for label-only branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Child indices in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    /// Initial collapse state.
    #[serde(skip_serializing_if = "is_false")]
    pub collapsed: bool,
}

/// The versioned routing/navigation snapshot for client consumption.
#[derive(Debug, Serialize)]
pub struct BuildManifest {
    /// Manifest layout version.
    pub schema_version: u32,
    /// Content-addressed build identifier shared by every payload.
    pub generation: String,
    /// Site identity.
    pub site: SiteInfo,
    /// Route → entry, sorted by route.
    pub routes: BTreeMap<String, RouteEntry>,
    /// Navigation node arena.
    pub nav: Vec<NavEntry>,
    /// Indices of top-level navigation nodes.
    pub nav_roots: Vec<usize>,
    /// Route → prev/next pair, sorted by route.
    pub links: BTreeMap<String, PageLinks>,
}

impl BuildManifest {
    /// Assemble the manifest and seal it with its generation identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Manifest`] if serialization for hashing fails.
    pub fn assemble(
        site: SiteInfo,
        records: &[DocRecord],
        tree: &NavTree,
        links: BTreeMap<String, PageLinks>,
    ) -> Result<Self, SiteError> {
        let routes = records
            .iter()
            .map(|record| {
                (
                    record.route.clone(),
                    RouteEntry {
                        title: record.meta.title.clone(),
                        hidden: record.meta.hidden,
                    },
                )
            })
            .collect();
        let nav = tree
            .nodes()
            .iter()
            .map(|node| NavEntry {
                title: node.title.clone(),
                route: node.route.clone(),
                children: node.children.clone(),
                collapsed: node.collapsed,
            })
            .collect();

        let mut manifest = Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            generation: String::new(),
            site,
            routes,
            nav,
            nav_roots: tree.roots().to_vec(),
            links,
        };
        manifest.generation = manifest.generation_id()?;
        Ok(manifest)
    }

    /// Truncated SHA-256 over the manifest serialized with an empty
    /// generation field.
    fn generation_id(&self) -> Result<String, SiteError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        Ok(hex::encode(&digest[..8]))
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
