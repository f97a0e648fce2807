//! Shared state structs for the page render walk.
//!
//! These structs track context while pulldown-cmark events are processed:
//! code block buffering, table alignment, image alt capture, heading
//! outline assembly, and plain-text section collection for search.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Language of current code block (e.g., "rust", "python").
    language: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    /// Check if we're inside a code block.
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the code block buffer.
    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a newline to the code block buffer.
    pub(crate) fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    /// Start the table header row.
    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    /// End the table header row.
    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Start a new table row.
    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    /// Move to the next cell.
    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Check if we're in the table header.
    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub(crate) struct ImageState {
    /// Whether we're inside an image tag.
    active: bool,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    /// Start capturing image alt text.
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    /// Check if we're inside an image.
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the alt text buffer.
    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Heading outline entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Anchor ID for linking.
    pub id: String,
    /// Heading text.
    pub text: String,
}

/// State for tracking headings and assembling the outline.
///
/// The first H1 repeats the page title in the navigation context, so it
/// is rendered but kept out of the outline.
pub(crate) struct HeadingState {
    /// Current heading level being processed (None if not in a heading).
    current_level: Option<u8>,
    /// Whether we've already passed the first H1.
    seen_first_h1: bool,
    /// Buffer for heading plain text (for the outline and anchor slug).
    text: String,
    /// Buffer for heading HTML (with inline formatting).
    html: String,
    /// Outline entries collected so far.
    outline: Vec<OutlineEntry>,
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new() -> Self {
        Self {
            current_level: None,
            seen_first_h1: false,
            text: String::new(),
            html: String::new(),
            outline: Vec::new(),
            id_counts: HashMap::new(),
        }
    }

    /// Check if we're currently inside a heading.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    /// Start tracking a heading.
    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the current heading.
    ///
    /// Generates a unique anchor id, records an outline entry (except for
    /// the first H1), and returns `(level, id, text, html)`.
    pub(crate) fn complete_heading(&mut self) -> Option<(u8, String, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);

        let id = self.generate_id(&text);

        let is_title = level == 1 && !self.seen_first_h1;
        if level == 1 {
            self.seen_first_h1 = true;
        }

        if !is_title {
            self.outline.push(OutlineEntry {
                level,
                id: id.clone(),
                text: text.trim().to_owned(),
            });
        }

        Some((level, id, text, html))
    }

    /// Generate a unique ID for a heading.
    ///
    /// Duplicate slugs get `-1`, `-2`, ... suffixes in document order.
    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    /// Append text to the heading plain-text buffer.
    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append HTML to the heading html buffer.
    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    /// Get the heading HTML buffer reference.
    pub(crate) fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    /// Take the collected outline.
    pub(crate) fn take_outline(&mut self) -> Vec<OutlineEntry> {
        std::mem::take(&mut self.outline)
    }
}

/// Plain-text fragment of a rendered page, anchored at a heading.
///
/// Sections feed the search index builder. Fenced code content is
/// excluded; inline formatting is flattened to text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Anchor id of the heading that opens the section (empty for the
    /// preamble before the first heading).
    pub anchor: String,
    /// Heading text (empty for the preamble).
    pub heading: String,
    /// Body text of the section.
    pub body: String,
}

/// Collects plain-text sections during the event walk.
pub(crate) struct SectionCollector {
    sections: Vec<Section>,
}

impl SectionCollector {
    pub(crate) fn new() -> Self {
        Self {
            // Preamble section for text before the first heading
            sections: vec![Section {
                anchor: String::new(),
                heading: String::new(),
                body: String::new(),
            }],
        }
    }

    /// Open a new section at a heading.
    pub(crate) fn start_section(&mut self, anchor: &str, heading: &str) {
        self.sections.push(Section {
            anchor: anchor.to_owned(),
            heading: heading.trim().to_owned(),
            body: String::new(),
        });
    }

    /// Append body text to the current section.
    ///
    /// A trailing space keeps adjacent fragments from merging into one
    /// token during search tokenization.
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(current) = self.sections.last_mut() {
            current.body.push_str(text);
            current.body.push(' ');
        }
    }

    /// Take the collected sections, dropping an empty preamble.
    pub(crate) fn take(&mut self) -> Vec<Section> {
        let mut sections = std::mem::take(&mut self.sections);
        for section in &mut sections {
            section.body = section.body.trim().to_owned();
        }
        if sections
            .first()
            .is_some_and(|s| s.anchor.is_empty() && s.body.is_empty())
        {
            sections.remove(0);
        }
        sections
    }
}

/// Convert text to a URL-safe anchor slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single
/// dashes, and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("rust".to_owned()));
        assert!(state.is_active());

        state.push_str("fn main() {}");
        let (lang, content) = state.end();
        assert_eq!(lang, Some("rust".to_owned()));
        assert_eq!(content, "fn main() {}");
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_state_first_h1_excluded_from_outline() {
        let mut state = HeadingState::new();

        state.start_heading(1);
        state.push_text("Page Title");
        let (level, id, text, _html) = state.complete_heading().unwrap();
        assert_eq!(level, 1);
        assert_eq!(id, "page-title");
        assert_eq!(text, "Page Title");

        state.start_heading(2);
        state.push_text("Section");
        state.complete_heading().unwrap();

        let outline = state.take_outline();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].id, "section");
        assert_eq!(outline[0].level, 2);
    }

    #[test]
    fn test_heading_state_second_h1_in_outline() {
        let mut state = HeadingState::new();

        state.start_heading(1);
        state.push_text("Title");
        state.complete_heading().unwrap();

        state.start_heading(1);
        state.push_text("Another Top Heading");
        state.complete_heading().unwrap();

        let outline = state.take_outline();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].text, "Another Top Heading");
    }

    #[test]
    fn test_heading_state_duplicate_ids() {
        let mut state = HeadingState::new();

        for _ in 0..3 {
            state.start_heading(2);
            state.push_text("FAQ");
            state.complete_heading().unwrap();
        }

        let outline = state.take_outline();
        assert_eq!(outline[0].id, "faq");
        assert_eq!(outline[1].id, "faq-1");
        assert_eq!(outline[2].id, "faq-2");
    }

    #[test]
    fn test_section_collector_preamble_dropped_when_empty() {
        let mut collector = SectionCollector::new();
        collector.start_section("intro", "Intro");
        collector.push_text("body text");

        let sections = collector.take();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].anchor, "intro");
        assert_eq!(sections[0].body, "body text");
    }

    #[test]
    fn test_section_collector_preamble_kept_when_nonempty() {
        let mut collector = SectionCollector::new();
        collector.push_text("leading prose");
        collector.start_section("first", "First");

        let sections = collector.take();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].anchor, "");
        assert_eq!(sections[0].body, "leading prose");
    }

    #[test]
    fn test_section_collector_separates_fragments() {
        let mut collector = SectionCollector::new();
        collector.push_text("alpha");
        collector.push_text("beta");

        let sections = collector.take();
        assert_eq!(sections[0].body, "alpha beta");
    }
}
