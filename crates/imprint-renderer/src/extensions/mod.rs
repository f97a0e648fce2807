//! Built-in syntax extensions.

mod abbreviations;
mod definition_lists;
mod footnotes;
mod typography;

pub use abbreviations::Abbreviations;
pub use definition_lists::DefinitionLists;
pub use footnotes::Footnotes;
pub use typography::Typography;

use crate::extension::SyntaxExtension;

/// Built-in extension names in default registration order.
pub const DEFAULT_EXTENSIONS: [&str; 4] = [
    "abbreviations",
    "definition-lists",
    "footnotes",
    "typography",
];

/// Look up a built-in extension by its configured name.
pub(crate) fn built_in(name: &str) -> Option<Box<dyn SyntaxExtension>> {
    match name {
        "abbreviations" => Some(Box::new(Abbreviations::new())),
        "definition-lists" => Some(Box::new(DefinitionLists)),
        "footnotes" => Some(Box::new(Footnotes)),
        "typography" => Some(Box::new(Typography)),
        _ => None,
    }
}
