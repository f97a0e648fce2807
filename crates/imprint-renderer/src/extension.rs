//! The syntax extension seam of the transform pipeline.

use pulldown_cmark::Options;

/// A composable markup extension applied around the markdown render.
///
/// Extensions contribute in three places: parser options before parsing,
/// a source rewrite before parsing, and an HTML rewrite after the event
/// walk. Each extension recognizes only its own syntax; when two could
/// claim overlapping spans, registration order decides and the earlier
/// extension wins.
///
/// # Example
///
/// ```
/// use imprint_renderer::SyntaxExtension;
///
/// struct Ellipsis;
///
/// impl SyntaxExtension for Ellipsis {
///     fn name(&self) -> &'static str {
///         "ellipsis"
///     }
///
///     fn postprocess(&mut self, html: &mut String) {
///         *html = html.replace("...", "\u{2026}");
///     }
/// }
/// ```
pub trait SyntaxExtension {
    /// Stable name used in configuration to select and order extensions.
    fn name(&self) -> &'static str;

    /// Parser options this extension contributes.
    fn parser_options(&self) -> Options {
        Options::empty()
    }

    /// Rewrite the markdown source before parsing.
    ///
    /// Returns `None` when the source needs no changes.
    fn preprocess(&mut self, _source: &str) -> Option<String> {
        None
    }

    /// Rewrite the rendered HTML after the event walk.
    fn postprocess(&mut self, _html: &mut String) {}
}

/// Error building a transform pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configured extension name matches no registered extension.
    #[error("unknown syntax extension `{0}`")]
    UnknownExtension(String),
}
