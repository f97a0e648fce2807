//! Definition list syntax (`Term` / `: definition`).

use pulldown_cmark::Options;

use crate::extension::SyntaxExtension;

/// The `definition-lists` extension.
///
/// Enables the parser's definition list support. Rendering is handled by
/// the standard event walk, so no pre or post processing is needed.
#[derive(Default)]
pub struct DefinitionLists;

impl DefinitionLists {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxExtension for DefinitionLists {
    fn name(&self) -> &'static str {
        "definition-lists"
    }

    fn parser_options(&self) -> Options {
        Options::ENABLE_DEFINITION_LIST
    }
}
