//! Application shell template.
//!
//! The shell is one static HTML page with empty mount points; the client
//! runtime fills them from `manifest.json` and the per-route payloads.
//! The mount ids (`#sidebar`, `#content`, `#outline`, `#page-links`,
//! `#search`, `#search-results`) and the `imprint:generation` meta are
//! the contract between this template and `assets/runtime.js`.

use std::fmt::Write;

use imprint_renderer::escape_html;
use imprint_site::SiteInfo;

/// Presentation options carried into the shell.
#[derive(Clone, Debug, Default)]
pub struct ShellOptions {
    /// Store path of a logo image, referenced under `assets/`.
    pub logo: Option<String>,
    /// CSS color emitted as the `--accent` custom property.
    pub accent_color: Option<String>,
    /// Opaque analytics identifier, emitted as a meta tag.
    pub analytics_id: Option<String>,
}

/// Render the application shell.
#[must_use]
pub fn render_shell(site: &SiteInfo, generation: &str, options: &ShellOptions) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&site.title));
    if let Some(description) = &site.description {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        );
    }
    let _ = writeln!(
        html,
        "<meta name=\"imprint:generation\" content=\"{}\">",
        escape_html(generation)
    );
    if let Some(id) = &options.analytics_id {
        let _ = writeln!(
            html,
            "<meta name=\"imprint:analytics\" content=\"{}\">",
            escape_html(id)
        );
    }
    if let Some(color) = &options.accent_color {
        let _ = writeln!(
            html,
            "<style>:root {{ --accent: {}; }}</style>",
            escape_html(color)
        );
    }
    html.push_str("<script type=\"module\" src=\"/assets/runtime.js\"></script>\n");
    html.push_str("</head>\n<body>\n");

    render_header(&mut html, site, options);

    html.push_str("<div class=\"layout\">\n");
    html.push_str("<nav id=\"sidebar\" aria-label=\"Site\"></nav>\n");
    html.push_str("<main id=\"content\">\n");
    html.push_str("<noscript>Navigation on this site requires JavaScript.</noscript>\n");
    html.push_str("</main>\n");
    html.push_str("<nav id=\"outline\" aria-label=\"On this page\"></nav>\n");
    html.push_str("</div>\n");
    html.push_str("<nav id=\"page-links\" aria-label=\"Adjacent pages\"></nav>\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, site: &SiteInfo, options: &ShellOptions) {
    html.push_str("<header class=\"site-header\">\n");
    if let Some(logo) = &options.logo {
        let _ = writeln!(
            html,
            "<img class=\"site-logo\" src=\"/assets/{}\" alt=\"\">",
            escape_html(logo)
        );
    }
    let _ = writeln!(
        html,
        "<a class=\"site-title\" href=\"/\">{}</a>",
        escape_html(&site.title)
    );
    if !site.links.is_empty() {
        html.push_str("<nav class=\"external-links\">\n");
        for link in &site.links {
            let _ = writeln!(
                html,
                "<a href=\"{}\" rel=\"noopener\">{}</a>",
                escape_html(&link.url),
                escape_html(&link.label)
            );
        }
        html.push_str("</nav>\n");
    }
    html.push_str("<div class=\"site-search\">\n");
    html.push_str("<input id=\"search\" type=\"search\" placeholder=\"Search\" autocomplete=\"off\">\n");
    html.push_str("<ul id=\"search-results\" hidden></ul>\n");
    html.push_str("</div>\n");
    html.push_str("</header>\n");
}
