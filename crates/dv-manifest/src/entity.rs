//! Entities, their language variants and version roots.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::page::Page;
use crate::path_helper::join_links;
use crate::version::{VersionStatus, compare_versions};

/// Pages scanned from one version directory.
#[derive(Clone, Debug)]
pub struct VersionRoot {
    label: String,
    path: PathBuf,
    pages: Vec<Page>,
    /// Relative link -> index into `pages`.
    index: HashMap<String, usize>,
}

impl VersionRoot {
    pub(crate) fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            pages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a page, replacing (in place) any page with the same relative link.
    ///
    /// Returns the replaced page.
    pub(crate) fn insert(&mut self, page: Page) -> Option<Page> {
        let link = page.relative_link();
        if let Some(&idx) = self.index.get(&link) {
            return Some(std::mem::replace(&mut self.pages[idx], page));
        }
        self.index.insert(link, self.pages.len());
        self.pages.push(page);
        None
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Directory the pages were scanned from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pages in scan order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page with exactly this relative link.
    pub fn page(&self, relative_link: &str) -> Option<&Page> {
        self.index.get(relative_link).map(|&idx| &self.pages[idx])
    }
}

/// One language variant of an entity.
///
/// Keeps copies of the entity's key, title and stable version so that links
/// can be built without going back to the [`Entity`].
#[derive(Clone, Debug)]
pub struct EntityLanguage {
    language: String,
    entity_key: String,
    entity_title: String,
    stable_version: String,
    link_base: String,
    versions: Vec<VersionRoot>,
}

impl EntityLanguage {
    pub(crate) fn new(
        language: impl Into<String>,
        entity_key: impl Into<String>,
        entity_title: impl Into<String>,
        stable_version: impl Into<String>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            entity_key: entity_key.into(),
            entity_title: entity_title.into(),
            stable_version: stable_version.into(),
            link_base: link_base.into(),
            versions: Vec::new(),
        }
    }

    pub(crate) fn with_versions(mut self, versions: Vec<VersionRoot>) -> Self {
        self.versions = versions;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn entity_key(&self) -> &str {
        &self.entity_key
    }

    pub fn entity_title(&self) -> &str {
        &self.entity_title
    }

    pub fn stable_version(&self) -> &str {
        &self.stable_version
    }

    /// Version roots, oldest first.
    pub fn versions(&self) -> &[VersionRoot] {
        &self.versions
    }

    pub fn version(&self, label: &str) -> Option<&VersionRoot> {
        self.versions.iter().find(|v| v.label == label)
    }

    pub fn has_version(&self, label: &str) -> bool {
        self.version(label).is_some()
    }

    /// Version served when a URL names none: the stable version when this
    /// language has it, otherwise the newest one it has.
    pub fn default_version(&self) -> &str {
        if self.has_version(&self.stable_version) {
            return &self.stable_version;
        }
        self.versions
            .last()
            .map_or(self.stable_version.as_str(), VersionRoot::label)
    }

    /// Page of the default version with this relative link.
    pub fn page(&self, relative_link: &str) -> Option<&Page> {
        self.page_in(self.default_version(), relative_link)
    }

    /// Page of `version` with exactly this relative link.
    pub fn page_in(&self, version: &str, relative_link: &str) -> Option<&Page> {
        self.version(version)?.page(relative_link)
    }

    /// Pages of `version` in scan order (empty for unknown versions).
    pub fn pages(&self, version: &str) -> &[Page] {
        self.version(version)
            .map(VersionRoot::pages)
            .unwrap_or_default()
    }

    /// Base URL of `version`, with a trailing slash.
    ///
    /// The stable version is addressed without a version segment.
    pub fn link(&self, version: &str) -> String {
        let mut parts = vec![
            "/",
            self.link_base.as_str(),
            self.language.as_str(),
            self.entity_key.as_str(),
        ];
        if version != self.stable_version {
            parts.push(version);
        }
        let mut link = join_links(&parts);
        if !link.ends_with('/') {
            link.push('/');
        }
        link
    }
}

/// A documented module: one key, one title, any number of languages and
/// versions.
#[derive(Clone, Debug)]
pub struct Entity {
    key: String,
    title: String,
    stable_version: String,
    /// Every version label known in any language, oldest first.
    versions: Vec<String>,
    languages: Vec<EntityLanguage>,
}

impl Entity {
    pub(crate) fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        stable_version: impl Into<String>,
        versions: Vec<String>,
        languages: Vec<EntityLanguage>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            stable_version: stable_version.into(),
            versions,
            languages,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn languages(&self) -> &[EntityLanguage] {
        &self.languages
    }

    pub fn language(&self, code: &str) -> Option<&EntityLanguage> {
        self.languages.iter().find(|l| l.language == code)
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn stable_version(&self) -> &str {
        &self.stable_version
    }

    pub fn is_stable(&self, version: &str) -> bool {
        self.stable_version == version
    }

    /// Where `version` stands relative to the stable version.
    ///
    /// Returns `None` for versions this entity does not have.
    pub fn classify(&self, version: &str) -> Option<VersionStatus> {
        if !self.versions.iter().any(|v| v == version) {
            return None;
        }
        if self.is_stable(version) || self.versions.len() == 1 {
            return Some(VersionStatus::Current);
        }
        Some(match compare_versions(version, &self.stable_version) {
            std::cmp::Ordering::Less => VersionStatus::Outdated,
            std::cmp::Ordering::Greater => VersionStatus::Future,
            std::cmp::Ordering::Equal => VersionStatus::Current,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::page::PageOwner;

    fn page(version: &str, relative_path: &str, title: &str) -> Page {
        Page::new(
            PageOwner {
                entity_key: "testdocs".to_owned(),
                language: "en".to_owned(),
                version: version.to_owned(),
            },
            format!("/docs/{version}/{relative_path}"),
            relative_path,
            title,
        )
    }

    fn root(label: &str, files: &[&str]) -> VersionRoot {
        let mut root = VersionRoot::new(label, format!("/docs/{label}"));
        for file in files {
            root.insert(page(label, file, file));
        }
        root
    }

    fn language() -> EntityLanguage {
        EntityLanguage::new("en", "testdocs", "Doc Test", "2.4", "dev/docs").with_versions(vec![
            root("2.3", &["index.md", "old.md"]),
            root("2.4", &["index.md", "guide/setup.md"]),
            root("3.0", &["index.md"]),
        ])
    }

    fn entity(stable: &str, versions: &[&str]) -> Entity {
        Entity::new(
            "testdocs",
            "Doc Test",
            stable,
            versions.iter().map(|v| (*v).to_owned()).collect(),
            Vec::new(),
        )
    }

    #[test]
    fn test_version_root_insert_replaces_in_place() {
        let mut root = root("2.4", &["a.md", "b.md"]);

        let replaced = root.insert(page("2.4", "A.markdown", "A again"));

        assert_eq!(replaced.map(|p| p.relative_path().to_owned()).as_deref(), Some("a.md"));
        let paths: Vec<_> = root.pages().iter().map(Page::relative_path).collect();
        assert_eq!(paths, vec!["A.markdown", "b.md"]);
        assert_eq!(root.page("a/").map(Page::title), Some("A again"));
    }

    #[test]
    fn test_page_lookup_uses_stable_version() {
        let language = language();

        assert_eq!(
            language.page("guide/setup/").map(Page::version),
            Some("2.4")
        );
        assert!(language.page("old/").is_none());
        assert_eq!(language.page_in("2.3", "old/").map(Page::version), Some("2.3"));
        assert!(language.page_in("9.9", "/").is_none());
    }

    #[test]
    fn test_page_lookup_is_case_sensitive() {
        let language = language();

        assert!(language.page("Guide/Setup/").is_none());
    }

    #[test]
    fn test_pages_in_scan_order() {
        let language = language();

        let links: Vec<_> = language.pages("2.4").iter().map(Page::relative_link).collect();
        assert_eq!(links, vec!["/", "guide/setup/"]);
        assert!(language.pages("1.0").is_empty());
    }

    #[test]
    fn test_link() {
        let language = language();

        assert_eq!(language.link("2.4"), "/dev/docs/en/testdocs/");
        assert_eq!(language.link("2.3"), "/dev/docs/en/testdocs/2.3/");
    }

    #[test]
    fn test_link_with_empty_base() {
        let language = EntityLanguage::new("fr", "cms/core", "Core", "1.0", "");

        assert_eq!(language.link("1.0"), "/fr/cms/core/");
    }

    #[test]
    fn test_default_version_falls_back_to_newest() {
        let language = EntityLanguage::new("fr", "testdocs", "Doc Test", "2.4", "docs")
            .with_versions(vec![root("2.3", &["index.md"])]);

        assert_eq!(language.default_version(), "2.3");
        assert!(language.page("/").is_some());
    }

    #[test]
    fn test_classify() {
        let entity = entity("2.4", &["2.3", "2.4", "3.0"]);

        assert_eq!(entity.classify("2.4"), Some(VersionStatus::Current));
        assert_eq!(entity.classify("2.3"), Some(VersionStatus::Outdated));
        assert_eq!(entity.classify("3.0"), Some(VersionStatus::Future));
        assert_eq!(entity.classify("9.9"), None);
    }

    #[test]
    fn test_classify_single_version_is_current() {
        let entity = entity("master", &["master"]);

        assert_eq!(entity.classify("master"), Some(VersionStatus::Current));
    }
}
