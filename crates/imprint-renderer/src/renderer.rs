//! Page renderer: the pulldown-cmark event walk.

use std::fmt::Write;

use pulldown_cmark::{BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::ledger::FootnoteLedger;
use crate::links::{self, LinkTarget, RouteResolver};
use crate::state::{
    CodeBlockState, HeadingState, ImageState, OutlineEntry, Section, SectionCollector, TableState,
    escape_html,
};

/// Context for rendering a single document.
pub struct RenderContext<'a> {
    /// Store-relative path of the source document (e.g. `guides/setup.md`).
    pub source_path: &'a str,
    /// Maps store-relative document paths to routes for internal links.
    pub resolver: &'a dyn RouteResolver,
}

/// Result of rendering a single document.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Rendered HTML body.
    pub html: String,
    /// Heading outline. The first H1 is rendered but excluded here.
    pub outline: Vec<OutlineEntry>,
    /// Plain-text sections for search indexing.
    pub sections: Vec<Section>,
    /// Store-relative paths of assets referenced by the page, deduplicated.
    pub assets: Vec<String>,
    /// Warnings produced during rendering.
    pub warnings: Vec<String>,
    /// Normalized store-relative targets of internal links that did not
    /// resolve to any document.
    pub broken_links: Vec<String>,
}

/// Alert classes for tagged blockquotes (`> [!NOTE]` and friends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Walks parser events for one document, producing a [`RenderedPage`].
pub(crate) struct PageRenderer<'a> {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    sections: SectionCollector,
    ledger: FootnoteLedger,
    /// Saved output while a footnote definition body is being captured.
    footnote_return: String,
    pending_image: Option<(String, String)>,
    /// Stack of alert kinds for nested blockquotes (regular blockquote uses None).
    alert_stack: Vec<Option<AlertKind>>,
    assets: Vec<String>,
    broken_links: Vec<String>,
    source_dir: String,
    resolver: &'a dyn RouteResolver,
}

impl<'a> PageRenderer<'a> {
    pub(crate) fn new(ctx: &RenderContext<'a>) -> Self {
        let source_dir = match ctx.source_path.rfind('/') {
            Some(pos) => ctx.source_path[..pos].to_owned(),
            None => String::new(),
        };

        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(),
            sections: SectionCollector::new(),
            ledger: FootnoteLedger::new(),
            footnote_return: String::new(),
            pending_image: None,
            alert_stack: Vec::new(),
            assets: Vec::new(),
            broken_links: Vec::new(),
            source_dir,
            resolver: ctx.resolver,
        }
    }

    /// Walk the events and assemble the page.
    pub(crate) fn render<'e, I>(mut self, events: I) -> RenderedPage
    where
        I: Iterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event);
        }

        let mut html = self.output;
        let warnings = self.ledger.finish(&mut html);

        RenderedPage {
            html,
            outline: self.heading.take_outline(),
            sections: self.sections.take(),
            assets: self.assets,
            warnings,
            broken_links: self.broken_links,
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(name) => {
                let site = self.ledger.reference(&name);
                self.push_inline(&site);
            }
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag after we have the ID
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(kind) => {
                let alert = kind.map(AlertKind::from);
                match alert {
                    Some(alert) => write!(
                        self.output,
                        r#"<div class="alert alert-{}"><p class="alert-title">{}</p>"#,
                        alert.class(),
                        alert.label()
                    )
                    .unwrap(),
                    None => self.output.push_str("<blockquote>"),
                }
                self.alert_stack.push(alert);
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        // First fence info token is the language
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => {
                self.output.push_str("<li>");
            }
            Tag::FootnoteDefinition(name) => {
                // Redirect output into the definition body until the end tag
                self.footnote_return = std::mem::take(&mut self.output);
                self.ledger.begin_definition(&name);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => {
                self.output.push_str("<dl>");
            }
            Tag::DefinitionListTitle => {
                self.output.push_str("<dt>");
            }
            Tag::DefinitionListDefinition => {
                self.output.push_str("<dd>");
            }
            Tag::Table(alignments) => {
                self.table.start(alignments.clone());
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let href = self.resolve_href(&dest_url);
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; image is rendered in end_tag
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_level) => {
                if let Some((level, id, text, html)) = self.heading.complete_heading() {
                    self.sections.start_section(&id, &text);
                    write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => match self.alert_stack.pop() {
                Some(Some(_alert)) => self.output.push_str("</div>"),
                _ => self.output.push_str("</blockquote>"),
            },
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => write!(
                        self.output,
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(&lang),
                        escape_html(&content)
                    )
                    .unwrap(),
                    None => write!(
                        self.output,
                        "<pre><code>{}</code></pre>",
                        escape_html(&content)
                    )
                    .unwrap(),
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition => {
                let body =
                    std::mem::replace(&mut self.output, std::mem::take(&mut self.footnote_return));
                self.ledger.end_definition(body);
            }
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                // Render image with collected alt text
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    self.write_image(&src, &alt, &title);
                }
            }
            TagEnd::DefinitionList => {
                self.output.push_str("</dl>");
            }
            TagEnd::DefinitionListTitle => {
                self.output.push_str("</dt>");
            }
            TagEnd::DefinitionListDefinition => {
                self.output.push_str("</dd>");
            }
            TagEnd::Table => {
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => {
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.sections.push_text(text);
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
            .unwrap();
        } else {
            self.sections.push_text(code);
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else {
            self.push_inline("\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked disabled> "#
        } else {
            r#"<input type="checkbox" disabled> "#
        });
    }

    /// Resolve a link destination, recording broken internal targets.
    fn resolve_href(&mut self, dest_url: &str) -> String {
        match links::resolve_md_link(dest_url, &self.source_dir, self.resolver) {
            LinkTarget::Unchanged => dest_url.to_owned(),
            LinkTarget::Route(href) => href,
            LinkTarget::Broken(target) => {
                // Keep the authored href; the caller decides whether broken
                // links are fatal
                self.broken_links.push(target);
                dest_url.to_owned()
            }
        }
    }

    fn write_image(&mut self, src: &str, alt: &str, title: &str) {
        let src = match links::resolve_asset_path(src, &self.source_dir) {
            Some(path) => {
                if !self.assets.contains(&path) {
                    self.assets.push(path.clone());
                }
                format!("/assets/{path}")
            }
            None => src.to_owned(),
        };

        write!(
            self.output,
            r#"<img src="{}" alt="{}""#,
            escape_html(&src),
            escape_html(alt)
        )
        .unwrap();
        if !title.is_empty() {
            write!(self.output, r#" title="{}""#, escape_html(title)).unwrap();
        }
        self.output.push('>');
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
