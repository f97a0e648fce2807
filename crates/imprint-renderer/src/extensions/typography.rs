//! Superscript and subscript syntax (`x^2^`, `H~2~O`).

use pulldown_cmark::Options;

use crate::extension::SyntaxExtension;

/// The `typography` extension.
#[derive(Default)]
pub struct Typography;

impl Typography {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxExtension for Typography {
    fn name(&self) -> &'static str {
        "typography"
    }

    fn parser_options(&self) -> Options {
        Options::ENABLE_SUPERSCRIPT | Options::ENABLE_SUBSCRIPT
    }
}
