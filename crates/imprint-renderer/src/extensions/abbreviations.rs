//! Abbreviation definitions and `<abbr>` expansion.
//!
//! Markdown Extra style definition lines:
//!
//! ```markdown
//! *[HTML]: HyperText Markup Language
//!
//! HTML is everywhere.
//! ```
//!
//! Definition lines are collected and stripped in preprocess. Postprocess
//! wraps whole-word occurrences in `<abbr title="...">`, skipping tag
//! interiors and `<code>`/`<pre>` content.

use crate::extension::SyntaxExtension;
use crate::fence::FenceTracker;
use crate::state::escape_html;

/// The `abbreviations` extension.
#[derive(Default)]
pub struct Abbreviations {
    /// Collected `(term, expansion)` pairs in definition order.
    definitions: Vec<(String, String)>,
}

impl Abbreviations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. Redefining a term replaces its expansion but
    /// keeps its original precedence position.
    fn define(&mut self, term: &str, expansion: &str) {
        if let Some(existing) = self.definitions.iter_mut().find(|(t, _)| t == term) {
            existing.1 = expansion.to_owned();
        } else {
            self.definitions
                .push((term.to_owned(), expansion.to_owned()));
        }
    }
}

impl SyntaxExtension for Abbreviations {
    fn name(&self) -> &'static str {
        "abbreviations"
    }

    fn preprocess(&mut self, source: &str) -> Option<String> {
        let mut output = String::with_capacity(source.len());
        let mut fence = FenceTracker::new();
        let mut stripped_any = false;

        let lines: Vec<&str> = source.lines().collect();
        let line_count = lines.len();

        for (idx, line) in lines.iter().enumerate() {
            fence.update(line);

            if !fence.in_fence()
                && let Some((term, expansion)) = parse_definition(line)
            {
                self.define(term, expansion);
                stripped_any = true;
                continue;
            }

            output.push_str(line);
            if idx < line_count - 1 || source.ends_with('\n') {
                output.push('\n');
            }
        }

        stripped_any.then_some(output)
    }

    fn postprocess(&mut self, html: &mut String) {
        let definitions = std::mem::take(&mut self.definitions);
        if definitions.is_empty() {
            return;
        }

        let matches = collect_matches(html, &definitions);
        if matches.is_empty() {
            return;
        }

        let mut result = String::with_capacity(html.len() + matches.len() * 32);
        let mut cursor = 0;
        for (start, end, def_idx) in matches {
            let (term, expansion) = &definitions[def_idx];
            result.push_str(&html[cursor..start]);
            result.push_str(&format!(
                r#"<abbr title="{}">{term}</abbr>"#,
                escape_html(expansion)
            ));
            cursor = end;
        }
        result.push_str(&html[cursor..]);
        *html = result;
    }
}

/// Parse a `*[TERM]: expansion` definition line.
fn parse_definition(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("*[")?;
    let close = rest.find("]:")?;
    let term = &rest[..close];
    let expansion = rest[close + 2..].trim();
    if term.is_empty() || expansion.is_empty() {
        return None;
    }
    Some((term, expansion))
}

/// Find whole-word term occurrences in text spans of the HTML.
///
/// Returns `(start, end, definition index)` triples in document order.
/// Spans inside tags or inside `<code>`/`<pre>` elements are skipped.
/// At a given position the first-defined matching term claims the span.
fn collect_matches(html: &str, definitions: &[(String, String)]) -> Vec<(usize, usize, usize)> {
    let mut matches = Vec::new();
    let mut in_tag = false;
    let mut code_depth = 0usize;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < html.len() {
        let Some(ch) = html[i..].chars().next() else {
            break;
        };

        if in_tag {
            if ch == '>' {
                in_tag = false;
            }
            prev = Some(ch);
            i += ch.len_utf8();
            continue;
        }

        if ch == '<' {
            in_tag = true;
            match element_at(&html[i..]) {
                Some((name, true)) if is_code_element(name) => {
                    code_depth = code_depth.saturating_sub(1);
                }
                Some((name, false)) if is_code_element(name) => {
                    code_depth += 1;
                }
                _ => {}
            }
            prev = Some(ch);
            i += 1;
            continue;
        }

        if code_depth == 0
            && !prev.is_some_and(char::is_alphanumeric)
            && let Some((end, def_idx)) = match_term_at(html, i, definitions)
        {
            matches.push((i, end, def_idx));
            prev = definitions[def_idx].0.chars().last();
            i = end;
            continue;
        }

        prev = Some(ch);
        i += ch.len_utf8();
    }

    matches
}

/// Try each term at `pos` in definition order, checking the trailing
/// word boundary.
fn match_term_at(
    html: &str,
    pos: usize,
    definitions: &[(String, String)],
) -> Option<(usize, usize)> {
    for (def_idx, (term, _)) in definitions.iter().enumerate() {
        if html[pos..].starts_with(term.as_str()) {
            let end = pos + term.len();
            let boundary_ok = html[end..]
                .chars()
                .next()
                .is_none_or(|next| !next.is_alphanumeric());
            if boundary_ok {
                return Some((end, def_idx));
            }
        }
    }
    None
}

/// Read the element name after a `<`, returning `(name, is_closing)`.
fn element_at(from: &str) -> Option<(&str, bool)> {
    let rest = &from[1..];
    let (rest, closing) = match rest.strip_prefix('/') {
        Some(r) => (r, true),
        None => (rest, false),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    (end > 0).then_some((&rest[..end], closing))
}

fn is_code_element(name: &str) -> bool {
    name.eq_ignore_ascii_case("code") || name.eq_ignore_ascii_case("pre")
}
