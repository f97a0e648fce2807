//! Per-route payload serialization.

use std::borrow::Cow;

use serde::Serialize;

use imprint_renderer::OutlineEntry;
use imprint_site::{CompiledPage, NavLink};

/// Borrowed serialization view over one compiled page.
///
/// Payloads are written once per emit and never read back by the
/// emitter, so this borrows everything from the [`CompiledPage`] instead
/// of cloning it. `html` is a [`Cow`] because asset substitution may
/// rewrite it at emit time.
#[derive(Debug, Serialize)]
pub struct PagePayload<'a> {
    /// Canonical route.
    pub route: &'a str,
    /// Display title.
    pub title: &'a str,
    /// Page description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// Document authors.
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub authors: &'a [String],
    /// Search keywords.
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub keywords: &'a [String],
    /// Rendered HTML body.
    pub html: Cow<'a, str>,
    /// Heading outline for the in-page table of contents.
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub outline: &'a [OutlineEntry],
    /// Previous document in reading order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<&'a NavLink>,
    /// Next document in reading order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<&'a NavLink>,
    /// Build identifier shared with the manifest.
    pub generation: &'a str,
    /// Source modification time, seconds since the Unix epoch.
    pub modified: u64,
}

impl<'a> PagePayload<'a> {
    /// Build the payload view for one page.
    #[must_use]
    pub fn new(page: &'a CompiledPage, generation: &'a str) -> Self {
        Self {
            route: &page.route,
            title: &page.title,
            description: page.description.as_deref(),
            authors: &page.authors,
            keywords: &page.keywords,
            html: Cow::Borrowed(&page.html),
            outline: &page.outline,
            prev: page.prev.as_ref(),
            next: page.next.as_ref(),
            generation,
            modified: page.modified,
        }
    }
}
