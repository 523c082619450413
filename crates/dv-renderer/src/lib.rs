//! Markdown to HTML rendering for documentation pages.
//!
//! [`MarkdownRenderer`] wraps pulldown-cmark and adds what a documentation
//! viewer needs on top of plain CommonMark:
//!
//! - relative links and images resolved against the page's base link
//! - markdown link targets (`../setup.md#usage`) rewritten to page URLs
//! - a table of contents with anchors for H2 and deeper headings
//!
//! # Example
//!
//! ```
//! use dv_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new()
//!     .with_base_link("/docs/en/framework/topics/")
//!     .render("# Topics\n\n## Setup\n\nSee [the installer](../installation.md).");
//!
//! assert_eq!(result.toc[0].id, "setup");
//! assert!(result.html.contains(r#"href="/docs/en/framework/installation/""#));
//! ```

mod link;
mod renderer;
mod util;

pub use link::{resolve_image, resolve_link};
pub use renderer::{MarkdownRenderer, RenderResult, TocEntry};
pub use util::{escape_html, slugify};
