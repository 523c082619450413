//! pulldown-cmark based renderer.

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::link::{resolve_image, resolve_link};
use crate::util::slugify;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (2-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID.
    pub id: String,
}

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Table of contents entries (H2 and deeper).
    pub toc: Vec<TocEntry>,
}

/// Default segment cleaner: drop a markdown extension and `index` files.
fn strip_markdown_extension(segment: &str) -> String {
    let name = segment
        .strip_suffix(".md")
        .or_else(|| segment.strip_suffix(".markdown"))
        .unwrap_or(segment);
    if name.eq_ignore_ascii_case("index") {
        String::new()
    } else {
        name.to_owned()
    }
}

/// Markdown renderer with base-link resolution.
///
/// GitHub Flavored Markdown extensions (tables, strikethrough, task lists,
/// footnotes) are always on. Without a base link, URLs are emitted exactly as
/// written.
pub struct MarkdownRenderer {
    base_link: Option<String>,
    clean_segment: fn(&str) -> String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_link: None,
            clean_segment: strip_markdown_extension,
        }
    }

    /// Resolve relative links and images against `base_link`.
    ///
    /// `base_link` is the URL of the directory holding the page's source file.
    #[must_use]
    pub fn with_base_link(mut self, base_link: impl Into<String>) -> Self {
        self.base_link = Some(base_link.into());
        self
    }

    /// Set how path segments of markdown links become URL segments.
    #[must_use]
    pub fn with_segment_cleaner(mut self, clean_segment: fn(&str) -> String) -> Self {
        self.clean_segment = clean_segment;
        self
    }

    /// Render markdown to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES;
        let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, options)
            .map(|event| self.rewrite_urls(event))
            .collect();

        let toc = annotate_headings(&mut events);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        RenderResult { html: out, toc }
    }

    fn rewrite_urls<'a>(&self, event: Event<'a>) -> Event<'a> {
        let Some(base) = self.base_link.as_deref() else {
            return event;
        };
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: CowStr::from(resolve_link(&dest_url, base, self.clean_segment)),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: CowStr::from(resolve_image(&dest_url, base)),
                title,
                id,
            }),
            other => other,
        }
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

/// Assign anchor IDs to H2-H6 headings and collect the table of contents.
///
/// Headings that already carry an explicit `{#id}` keep it. Duplicate slugs
/// get a numeric suffix (`setup`, `setup-1`, ...). H1 headings are left alone.
fn annotate_headings(events: &mut [Event<'_>]) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level;

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }
        let text = text.trim().to_owned();

        if level == HeadingLevel::H1 {
            i = end + 1;
            continue;
        }

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            let anchor = match id {
                Some(existing) => existing.to_string(),
                None => {
                    let base = slugify(&text);
                    let base = if base.is_empty() {
                        "section".to_owned()
                    } else {
                        base
                    };
                    let count = seen.entry(base.clone()).or_insert(0);
                    let anchor = if *count == 0 {
                        base
                    } else {
                        format!("{base}-{count}")
                    };
                    *count += 1;
                    *id = Some(CowStr::from(anchor.clone()));
                    anchor
                }
            };
            toc.push(TocEntry {
                level: heading_level_to_num(level),
                title: text,
                id: anchor,
            });
        }

        i = end + 1;
    }

    toc
}
