//! Front-matter block handling.
//!
//! Provides functions for splitting a document into its front-matter block
//! and body, and for parsing the block as a YAML mapping.

use thiserror::Error;

/// Error parsing a front-matter block.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    /// The block is not valid YAML.
    #[error("invalid YAML in front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The block parsed but is not a key/value mapping.
    #[error("front matter must be a mapping of keys to values, found {found}")]
    NotMapping {
        /// YAML node type that was found instead.
        found: &'static str,
    },
}

/// Split a document into its front-matter block and body.
///
/// A front-matter block starts with `---` on the very first line and ends
/// at the next line consisting of `---`. Returns the block text (without
/// delimiters) and the remaining body.
///
/// Documents without an opening delimiter, and documents whose opening
/// delimiter is never closed, are returned whole as the body.
#[must_use]
pub fn split(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source.strip_prefix("---") else {
        return (None, source);
    };
    // The opening delimiter must occupy the whole first line
    let Some(rest) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(block), body);
        }
        offset += line.len();
    }

    // Unclosed block: treat the whole document as body
    (None, source)
}

/// Parse a front-matter block as a YAML mapping.
///
/// An empty or whitespace-only block parses to an empty mapping.
///
/// # Errors
///
/// Returns [`FrontMatterError`] if the block is not valid YAML or parses
/// to something other than a mapping (e.g. a bare string or a sequence).
pub fn parse(block: &str) -> Result<serde_yaml::Mapping, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(serde_yaml::Mapping::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(block)?;
    match value {
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        serde_yaml::Value::Bool(_) => Err(FrontMatterError::NotMapping { found: "a boolean" }),
        serde_yaml::Value::Number(_) => Err(FrontMatterError::NotMapping { found: "a number" }),
        serde_yaml::Value::String(_) => Err(FrontMatterError::NotMapping { found: "a string" }),
        serde_yaml::Value::Sequence(_) => Err(FrontMatterError::NotMapping { found: "a list" }),
        _ => Err(FrontMatterError::NotMapping {
            found: "an unsupported node",
        }),
    }
}
