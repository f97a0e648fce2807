//! Transform pipeline: ordered syntax extensions around the render walk.

use pulldown_cmark::{Options, Parser};

use crate::extension::{PipelineError, SyntaxExtension};
use crate::extensions;
use crate::renderer::{PageRenderer, RenderContext, RenderedPage};

/// Ordered collection of syntax extensions driving page rendering.
///
/// Rendering runs in three phases: every extension's `preprocess` in
/// registration order, the parser event walk with the union of parser
/// options, then every extension's `postprocess` in registration order.
///
/// # Example
///
/// ```
/// use imprint_renderer::{RenderContext, RouteResolver, TransformPipeline};
///
/// struct NoRoutes;
///
/// impl RouteResolver for NoRoutes {
///     fn route_for(&self, _source_path: &str) -> Option<String> {
///         None
///     }
/// }
///
/// let mut pipeline = TransformPipeline::with_defaults();
/// let ctx = RenderContext {
///     source_path: "index.md",
///     resolver: &NoRoutes,
/// };
/// let page = pipeline.render_page("# Hello\n\nWorld[^a].\n\n[^a]: A note.", &ctx);
/// assert!(page.html.contains("footnote-ref"));
/// ```
pub struct TransformPipeline {
    extensions: Vec<Box<dyn SyntaxExtension>>,
}

impl TransformPipeline {
    /// Create an empty pipeline. Base GFM syntax is always available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Create a pipeline with the built-in default extensions.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_names(&extensions::DEFAULT_EXTENSIONS)
            .expect("default extension names are built in")
    }

    /// Create a pipeline from configured extension names.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownExtension`] for a name with no
    /// built-in implementation.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PipelineError> {
        let mut pipeline = Self::new();
        for name in names {
            let name = name.as_ref();
            let extension = extensions::built_in(name)
                .ok_or_else(|| PipelineError::UnknownExtension(name.to_owned()))?;
            pipeline.extensions.push(extension);
        }
        Ok(pipeline)
    }

    /// Append a custom extension.
    #[must_use]
    pub fn with_extension<E: SyntaxExtension + 'static>(mut self, extension: E) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Names of the registered extensions, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extensions.iter().map(|ext| ext.name())
    }

    /// Parser options: base GFM plus each extension's contribution.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        self.extensions
            .iter()
            .fold(base, |options, ext| options | ext.parser_options())
    }

    /// Render one document through the full pipeline.
    pub fn render_page(&mut self, source: &str, ctx: &RenderContext<'_>) -> RenderedPage {
        // Extensions that change nothing return None from preprocess, so
        // the common case stays allocation-free
        let mut owned: Option<String> = None;
        for ext in &mut self.extensions {
            if let Some(next) = ext.preprocess(owned.as_deref().unwrap_or(source)) {
                owned = Some(next);
            }
        }
        let text = owned.as_deref().unwrap_or(source);

        let parser = Parser::new_ext(text, self.parser_options());
        let mut page = PageRenderer::new(ctx).render(parser);

        for ext in &mut self.extensions {
            ext.postprocess(&mut page.html);
        }

        page
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("extensions", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
