//! Footnote ledger: collection, numbering, and back-link assembly.
//!
//! Footnotes are the one stateful piece of the render walk. Reference
//! sites emit placeholders into the output stream; definition bodies are
//! captured by output redirection. After the walk, [`FootnoteLedger::finish`]
//! numbers references in first-use order, swaps the placeholders for
//! anchor markup, and appends the footnotes section.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::state::escape_html;

/// Collects footnote reference sites and definition bodies during a walk.
#[derive(Default)]
pub(crate) struct FootnoteLedger {
    /// Footnote name per reference site, in document order.
    sites: Vec<String>,
    /// Definition bodies by name. The first definition wins.
    definitions: HashMap<String, String>,
    /// Name of the definition currently being captured.
    capturing: Option<String>,
}

impl FootnoteLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a reference site and return the placeholder to emit.
    pub(crate) fn reference(&mut self, name: &str) -> String {
        self.sites.push(name.to_owned());
        placeholder(self.sites.len() - 1)
    }

    /// Begin capturing a definition body.
    pub(crate) fn begin_definition(&mut self, name: &str) {
        self.capturing = Some(name.to_owned());
    }

    /// Finish capturing a definition body.
    pub(crate) fn end_definition(&mut self, body: String) {
        if let Some(name) = self.capturing.take() {
            self.definitions.entry(name).or_insert(body);
        }
    }

    /// Resolve placeholders, append the footnotes section, and report
    /// unresolved references and unreferenced definitions.
    pub(crate) fn finish(self, html: &mut String) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.sites.is_empty() && self.definitions.is_empty() {
            return warnings;
        }

        // Number defined footnotes in first-use order; undefined references
        // keep no number so visible numbering stays gapless
        let mut numbers: HashMap<&str, usize> = HashMap::new();
        let mut numbered: Vec<&str> = Vec::new();
        for name in &self.sites {
            if self.definitions.contains_key(name.as_str())
                && !numbers.contains_key(name.as_str())
            {
                numbers.insert(name, numbered.len() + 1);
                numbered.push(name);
            }
        }

        let mut occurrence: HashMap<&str, usize> = HashMap::new();
        let mut backrefs: HashMap<&str, Vec<String>> = HashMap::new();
        let mut reported: HashSet<&str> = HashSet::new();
        let mut site_markup: Vec<String> = Vec::with_capacity(self.sites.len());

        for name in &self.sites {
            let markup = match numbers.get(name.as_str()) {
                Some(&number) => {
                    let occ = occurrence.entry(name).or_insert(0);
                    *occ += 1;
                    let ref_id = if *occ == 1 {
                        format!("fnref-{number}")
                    } else {
                        format!("fnref-{number}-{occ}")
                    };
                    backrefs.entry(name).or_default().push(ref_id.clone());
                    format!(
                        r##"<sup class="footnote-ref" id="{ref_id}"><a href="#fn-{number}">{number}</a></sup>"##
                    )
                }
                None => {
                    if reported.insert(name) {
                        warnings.push(format!("unresolved footnote reference [^{name}]"));
                    }
                    escape_html(&format!("[^{name}]"))
                }
            };
            site_markup.push(markup);
        }

        if !numbered.is_empty() {
            html.push_str(r#"<section class="footnotes"><ol>"#);
            for (i, name) in numbered.iter().enumerate() {
                let number = i + 1;
                let body = self
                    .definitions
                    .get(*name)
                    .map(String::as_str)
                    .unwrap_or_default();
                write!(html, r#"<li id="fn-{number}">{}"#, body.trim()).unwrap();
                if let Some(ids) = backrefs.get(name) {
                    for (k, ref_id) in ids.iter().enumerate() {
                        if k == 0 {
                            write!(
                                html,
                                r##" <a href="#{ref_id}" class="footnote-backref">↩</a>"##
                            )
                            .unwrap();
                        } else {
                            write!(
                                html,
                                r##" <a href="#{ref_id}" class="footnote-backref">↩<sup>{}</sup></a>"##,
                                k + 1
                            )
                            .unwrap();
                        }
                    }
                }
                html.push_str("</li>");
            }
            html.push_str("</ol></section>");
        }

        // Swap placeholders after the section is appended so references
        // inside definition bodies resolve too
        for (idx, markup) in site_markup.iter().enumerate() {
            *html = html.replacen(&placeholder(idx), markup, 1);
        }

        let used: HashSet<&str> = self.sites.iter().map(String::as_str).collect();
        let mut unreferenced: Vec<&str> = self
            .definitions
            .keys()
            .map(String::as_str)
            .filter(|name| !used.contains(name))
            .collect();
        unreferenced.sort_unstable();
        for name in unreferenced {
            warnings.push(format!("unreferenced footnote definition [^{name}]"));
        }

        warnings
    }
}

fn placeholder(idx: usize) -> String {
    format!("{{{{FOOTNOTE_REF_{idx}}}}}")
}
