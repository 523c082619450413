//! Minimal HTML shell around rendered pages.

use std::fmt::Write;

use dv_manifest::{ManifestState, PageMatch, VersionStatus};
use dv_renderer::{RenderResult, TocEntry, escape_html};

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
                     .version-warning{background:#fff4ce;border:1px solid #e0c36b;padding:.75rem 1rem}\
                     .versions a{margin-right:.5rem}\
                     .versions .current{font-weight:bold}\
                     .toc ul{list-style:none;padding-left:1rem}";

/// Notice shown above pages of a non-stable version.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct VersionWarning {
    pub(crate) status: VersionStatus,
    pub(crate) version: String,
    pub(crate) stable_version: String,
    /// Link to the stable version of the same language.
    pub(crate) stable_link: String,
}

impl VersionWarning {
    /// Warning for a resolved page, if its version is not current.
    pub(crate) fn for_match(found: &PageMatch) -> Option<Self> {
        let status = found.version_status()?;
        if !status.needs_warning() {
            return None;
        }
        let language = found.language();
        Some(Self {
            status,
            version: found.version().to_owned(),
            stable_version: language.stable_version().to_owned(),
            stable_link: language.link(language.stable_version()),
        })
    }

    fn to_html(&self) -> String {
        let message = match self.status {
            VersionStatus::Outdated => format!(
                "This document is for an outdated version ({}).",
                escape_html(&self.version)
            ),
            VersionStatus::Future => format!(
                "This document is for an upcoming release ({}) and may change.",
                escape_html(&self.version)
            ),
            VersionStatus::Current => return String::new(),
        };
        format!(
            r#"<div class="version-warning">{message} <a href="{}">Go to the stable version ({})</a>.</div>"#,
            escape_html(&self.stable_link),
            escape_html(&self.stable_version)
        )
    }
}

fn document(language: &str, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(language),
        escape_html(title)
    )
}

/// On-page navigation for H2 and deeper headings, nested by level.
fn toc(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let base = entries.iter().map(|entry| entry.level).min().unwrap_or(2);
    let mut html = String::from(r#"<nav class="toc">"#);
    let mut depth = 0;
    for entry in entries {
        let target = usize::from(entry.level - base) + 1;
        while depth < target {
            html.push_str("<ul>");
            depth += 1;
        }
        while depth > target {
            html.push_str("</ul>");
            depth -= 1;
        }
        let _ = write!(
            html,
            r##"<li><a href="#{}">{}</a></li>"##,
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
    }
    for _ in 0..depth {
        html.push_str("</ul>");
    }
    html.push_str("</nav>\n");
    html
}

/// Full page for a resolved documentation page.
pub(crate) fn page(
    found: &PageMatch,
    rendered: &RenderResult,
    warning: Option<&VersionWarning>,
) -> String {
    let language = found.language();
    let mut html = String::new();

    if let Some(warning) = warning {
        html.push_str(&warning.to_html());
        html.push('\n');
    }

    if language.versions().len() > 1 {
        html.push_str(r#"<nav class="versions">"#);
        for root in language.versions() {
            let class = if root.label() == found.version() {
                r#" class="current""#
            } else {
                ""
            };
            let _ = write!(
                html,
                r#"<a href="{}"{class}>{}</a>"#,
                escape_html(&language.link(root.label())),
                escape_html(root.label())
            );
        }
        html.push_str("</nav>\n");
    }

    if let Some(summary) = found.page().summary() {
        let _ = writeln!(html, r#"<p class="summary">{}</p>"#, escape_html(summary));
    }
    html.push_str(&toc(&rendered.toc));
    let _ = write!(html, "<main>\n{}</main>", rendered.html);

    document(language.language(), &found.breadcrumb_title(" - "), &html)
}

/// Listing of every entity with its languages and versions.
pub(crate) fn index(state: &ManifestState) -> String {
    let mut html = String::from("<h1>Documentation</h1>\n");
    if state.entities().is_empty() {
        html.push_str("<p>No documentation registered.</p>");
        return document("en", "Documentation", &html);
    }

    html.push_str("<ul>\n");
    for entity in state.entities() {
        let _ = write!(html, "<li>{}<ul>", escape_html(entity.title()));
        for language in entity.languages() {
            let _ = write!(
                html,
                r#"<li><a href="{}">{}</a>"#,
                escape_html(&language.link(language.default_version())),
                escape_html(language.language())
            );
            for root in language.versions() {
                let _ = write!(
                    html,
                    r#" <a href="{}">{}</a>"#,
                    escape_html(&language.link(root.label())),
                    escape_html(root.label())
                );
            }
            html.push_str("</li>");
        }
        html.push_str("</ul></li>\n");
    }
    html.push_str("</ul>");

    document("en", "Documentation", &html)
}

/// Body of the 404 response.
pub(crate) fn not_found(path: &str) -> String {
    let body = format!(
        "<h1>Page not found</h1>\n<p>No documentation page matches <code>{}</code>.</p>",
        escape_html(path)
    );
    document("en", "Page not found", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(status: VersionStatus) -> VersionWarning {
        VersionWarning {
            status,
            version: "2.3".to_owned(),
            stable_version: "2.4".to_owned(),
            stable_link: "/dev/docs/en/testdocs/".to_owned(),
        }
    }

    #[test]
    fn test_outdated_warning_html() {
        let html = warning(VersionStatus::Outdated).to_html();

        assert!(html.contains("outdated version (2.3)"));
        assert!(html.contains(r#"href="/dev/docs/en/testdocs/""#));
    }

    #[test]
    fn test_future_warning_html() {
        let html = warning(VersionStatus::Future).to_html();

        assert!(html.contains("upcoming release (2.3)"));
    }

    fn entry(level: u8, title: &str, id: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: id.to_owned(),
        }
    }

    #[test]
    fn test_toc_nests_by_level() {
        let html = toc(&[
            entry(2, "Setup", "setup"),
            entry(3, "Details", "details"),
            entry(2, "Usage & Tips", "usage-tips"),
        ]);

        assert_eq!(
            html,
            "<nav class=\"toc\"><ul><li><a href=\"#setup\">Setup</a></li>\
             <ul><li><a href=\"#details\">Details</a></li></ul>\
             <li><a href=\"#usage-tips\">Usage &amp; Tips</a></li></ul></nav>\n"
        );
    }

    #[test]
    fn test_toc_empty() {
        assert_eq!(toc(&[]), "");
    }

    #[test]
    fn test_not_found_escapes_path() {
        let html = not_found("<script>");

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
