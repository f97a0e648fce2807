//! Front-matter metadata extraction.
//!
//! [`MetadataExtractor`] normalizes each document's declared front-matter
//! into a [`PageMetadata`] record. Title resolution falls back from the
//! front-matter `title` to the first `# H1` in the body to a title derived
//! from the filename; only the last step marks the record `untitled`
//! (a build warning, not an error).
//!
//! Known keys with values of the wrong type are fatal. Unknown keys are
//! ignored.

use imprint_storage::Document;
use regex::Regex;

use crate::error::SiteError;
use crate::routes::PrefixSplitter;

/// Explicit `prev`/`next` declaration from front-matter.
///
/// `false` suppresses the link even when reading order would infer one;
/// a string pins the link to a specific document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkOverride {
    /// Key omitted: infer the link from reading order.
    #[default]
    Inferred,
    /// Key set to `false`: no link, overriding inference.
    Suppressed,
    /// Key set to a string: link to this route or source path.
    Explicit(String),
}

/// Normalized metadata record for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMetadata {
    /// Display title.
    pub title: String,
    /// True when the title was derived from the filename.
    pub untitled: bool,
    /// Optional page description.
    pub description: Option<String>,
    /// Document authors.
    pub authors: Vec<String>,
    /// Search keywords.
    pub keywords: Vec<String>,
    /// Explicit ordering key, beats any filename prefix.
    pub order: Option<u32>,
    /// Previous-link declaration.
    pub prev: LinkOverride,
    /// Next-link declaration.
    pub next: LinkOverride,
    /// Hidden documents keep their route and payload but appear in
    /// neither the navigation tree nor the reading order.
    pub hidden: bool,
}

/// One document joined with its metadata and canonical route.
#[derive(Clone, Debug)]
pub struct DocRecord {
    /// The loaded source document.
    pub document: Document,
    /// Canonical route.
    pub route: String,
    /// Extracted metadata.
    pub meta: PageMetadata,
}

/// Extracts [`PageMetadata`] from loaded documents.
pub struct MetadataExtractor {
    h1: Regex,
    prefix: PrefixSplitter,
}

impl MetadataExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            h1: Regex::new(r"(?m)^#\s+(.+)$").unwrap(),
            prefix: PrefixSplitter::new(),
        }
    }

    /// Normalize a document's front-matter.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::FrontMatter`] when a known key carries a value
    /// of the wrong type (non-string `title`, non-boolean `hidden`, ...).
    pub fn extract(&self, document: &Document) -> Result<PageMetadata, SiteError> {
        let path = &document.source_path;

        let (title, untitled) = match string_value(document, "title")? {
            Some(title) => (title, false),
            None => match self.h1_title(&document.body) {
                Some(title) => (title, false),
                None => (self.title_from_path(path), true),
            },
        };

        let order = match document.front_matter_value("order") {
            None => None,
            Some(serde_yaml::Value::Number(number)) => {
                match number.as_u64().and_then(|value| u32::try_from(value).ok()) {
                    Some(value) => Some(value),
                    None => {
                        return Err(front_matter_error(
                            path,
                            "`order` must be a non-negative integer",
                        ));
                    }
                }
            }
            Some(_) => {
                return Err(front_matter_error(
                    path,
                    "`order` must be a non-negative integer",
                ));
            }
        };

        let hidden = match document.front_matter_value("hidden") {
            None => false,
            Some(serde_yaml::Value::Bool(flag)) => *flag,
            Some(_) => return Err(front_matter_error(path, "`hidden` must be a boolean")),
        };

        Ok(PageMetadata {
            title,
            untitled,
            description: string_value(document, "description")?,
            authors: list_value(document, "authors")?,
            keywords: list_value(document, "keywords")?,
            order,
            prev: link_override(document, "prev")?,
            next: link_override(document, "next")?,
            hidden,
        })
    }

    /// Extract the first H1 heading from the body.
    fn h1_title(&self, body: &str) -> Option<String> {
        self.h1
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
    }

    /// Derive a title from the filename; index pages take their
    /// directory's name.
    fn title_from_path(&self, source_path: &str) -> String {
        let name = source_path.rsplit('/').next().unwrap_or(source_path);
        let name = name.strip_suffix(".md").unwrap_or(name);
        let (_, name) = self.prefix.split(name);

        if name == "index"
            && let Some(dir) = source_path.rsplit('/').nth(1)
        {
            let (_, dir) = self.prefix.split(dir);
            return title_from_name(dir);
        }

        title_from_name(name)
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a display title from a file or directory name.
#[must_use]
pub fn title_from_name(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn front_matter_error(path: &str, reason: &str) -> SiteError {
    SiteError::FrontMatter {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

fn string_value(document: &Document, key: &str) -> Result<Option<String>, SiteError> {
    match document.front_matter_value(key) {
        None => Ok(None),
        Some(serde_yaml::Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(front_matter_error(
            &document.source_path,
            &format!("`{key}` must be a string"),
        )),
    }
}

/// Parse a comma-separated string or a sequence of strings.
fn list_value(document: &Document, key: &str) -> Result<Vec<String>, SiteError> {
    let Some(value) = document.front_matter_value(key) else {
        return Ok(Vec::new());
    };

    match value {
        serde_yaml::Value::String(value) => Ok(value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect()),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                serde_yaml::Value::String(value) => Ok(value.trim().to_owned()),
                _ => Err(front_matter_error(
                    &document.source_path,
                    &format!("`{key}` entries must be strings"),
                )),
            })
            .collect(),
        _ => Err(front_matter_error(
            &document.source_path,
            &format!("`{key}` must be a string or a sequence of strings"),
        )),
    }
}

fn link_override(document: &Document, key: &'static str) -> Result<LinkOverride, SiteError> {
    match document.front_matter_value(key) {
        None => Ok(LinkOverride::Inferred),
        Some(serde_yaml::Value::Bool(false)) => Ok(LinkOverride::Suppressed),
        Some(serde_yaml::Value::String(target)) => Ok(LinkOverride::Explicit(target.clone())),
        Some(_) => Err(front_matter_error(
            &document.source_path,
            &format!("`{key}` must be a route string or `false`"),
        )),
    }
}
