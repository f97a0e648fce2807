//! Footnote references and definitions.

use pulldown_cmark::Options;

use crate::extension::SyntaxExtension;

/// The `footnotes` extension.
///
/// Enables footnote parsing. The renderer numbers references in first-use
/// order and collects definitions into a trailing section with back links,
/// so this extension only has to switch the parser option on. Without it
/// `[^name]` stays literal text.
#[derive(Default)]
pub struct Footnotes;

impl Footnotes {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxExtension for Footnotes {
    fn name(&self) -> &'static str {
        "footnotes"
    }

    fn parser_options(&self) -> Options {
        Options::ENABLE_FOOTNOTES
    }
}
