//! A single documentation page.

use std::path::{Path, PathBuf};

use dv_renderer::{MarkdownRenderer, RenderResult};
use dv_storage::Storage;

use crate::entity::EntityLanguage;
use crate::metadata;
use crate::path_helper::{self, clean_page_name, clean_page_url, join_links};

/// Identifies the entity language and version a page belongs to.
///
/// Resolve it through [`ManifestState`](crate::ManifestState) to reach the
/// owning [`EntityLanguage`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageOwner {
    pub entity_key: String,
    pub language: String,
    pub version: String,
}

/// One markdown file inside a version root.
///
/// Title and summary start out derived from the filename and are replaced by
/// the page's metadata block once its content has been read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    owner: PageOwner,
    path: PathBuf,
    relative_path: String,
    filename: String,
    default_title: String,
    title: Option<String>,
    summary: Option<String>,
}

impl Page {
    /// Create a page for the file at `path`.
    ///
    /// `relative_path` is the `/`-separated path below the version root
    /// (e.g. `topics/01-install.md`).
    pub fn new(
        owner: PageOwner,
        path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        default_title: impl Into<String>,
    ) -> Self {
        let relative_path = relative_path.into();
        let filename = relative_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        Self {
            owner,
            path: path.into(),
            relative_path,
            filename,
            default_title: default_title.into(),
            title: None,
            summary: None,
        }
    }

    pub fn owner(&self) -> &PageOwner {
        &self.owner
    }

    pub fn version(&self) -> &str {
        &self.owner.version
    }

    /// Storage path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source path below the version root.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn extension(&self) -> &str {
        path_helper::extension(&self.filename)
    }

    /// Title from the metadata block, falling back to the filename.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.default_title)
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// URL of the page relative to its version root.
    ///
    /// Every segment is cleaned with [`clean_page_url`]; the result always ends
    /// with a single `/` and is `/` for the root index.
    pub fn relative_link(&self) -> String {
        let segments: Vec<String> = self
            .relative_path
            .split('/')
            .map(clean_page_url)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            "/".to_owned()
        } else {
            format!("{}/", segments.join("/"))
        }
    }

    /// Absolute URL of the page.
    pub fn link(&self, owner: &EntityLanguage) -> String {
        join_links(&[
            owner.link(&self.owner.version).as_str(),
            self.relative_link().as_str(),
        ])
    }

    /// URL of the directory holding the source file, used to resolve
    /// relative links in the page body.
    fn base_link(&self, owner: &EntityLanguage) -> String {
        let dir = self
            .relative_path
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir);
        let segments: Vec<String> = dir
            .split('/')
            .map(clean_page_url)
            .filter(|s| !s.is_empty())
            .collect();
        let mut parts = vec![owner.link(&self.owner.version)];
        parts.extend(segments);
        parts.push("/".to_owned());
        join_links(&parts.iter().map(String::as_str).collect::<Vec<_>>())
    }

    /// Plain-text title made of the entity title, the section names along the
    /// page's URL and the page title.
    pub fn breadcrumb_title(&self, owner: &EntityLanguage, divider: &str) -> String {
        let mut parts = vec![owner.entity_title().to_owned()];
        parts.extend(
            self.relative_link()
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|segment| clean_page_name(segment, "")),
        );
        parts.push(self.title().to_owned());
        parts.join(divider)
    }

    /// Apply the metadata block at the start of `text` to this page.
    ///
    /// Returns the text to display, without the block when `remove` is set
    /// and the block held a known field.
    pub fn populate_metadata_from_text(&mut self, text: &str, remove: bool) -> String {
        let (found, body) = metadata::extract(text, remove);
        if let Some(title) = found.title {
            self.title = Some(title);
        }
        if let Some(summary) = found.summary {
            self.summary = Some(summary);
        }
        body.to_owned()
    }

    /// Read the raw markdown, applying its metadata block to this page.
    ///
    /// Returns `None` when the file cannot be read.
    pub fn markdown(&mut self, storage: &dyn Storage, remove_metadata: bool) -> Option<String> {
        let text = match storage.read(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "Failed to read page");
                return None;
            }
        };

        if self.title.as_deref() == Some("Index") {
            return Some(text);
        }
        Some(self.populate_metadata_from_text(&text, remove_metadata))
    }

    /// Render the page body with relative links resolved against the page's
    /// location, keeping the table of contents.
    pub fn render(
        &mut self,
        storage: &dyn Storage,
        owner: &EntityLanguage,
    ) -> Option<RenderResult> {
        let markdown = self.markdown(storage, true)?;
        Some(
            MarkdownRenderer::new()
                .with_base_link(self.base_link(owner))
                .with_segment_cleaner(clean_page_url)
                .render(&markdown),
        )
    }

    /// Render the page body to HTML, see [`render`](Self::render).
    pub fn html(&mut self, storage: &dyn Storage, owner: &EntityLanguage) -> Option<String> {
        self.render(storage, owner).map(|rendered| rendered.html)
    }
}
