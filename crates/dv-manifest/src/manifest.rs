//! The documentation manifest: build, cache and resolve.
//!
//! # Thread Safety
//!
//! [`Manifest`] is shared between request handlers:
//! - the current snapshot lives in a `RwLock<Arc<ManifestState>>`, readers
//!   only clone the `Arc`
//! - rebuilds are serialised by a `Mutex<()>` and swap in a complete new
//!   snapshot, so a reader never sees a half-built index
//! - `invalidate()` only flips an atomic flag

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use dv_renderer::RenderResult;
use dv_storage::Storage;

use crate::entity::{Entity, EntityLanguage};
use crate::page::{Page, PageOwner};
use crate::scanner::{ScanWarning, Scanner};
use crate::version::VersionStatus;

/// One registered documentation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityRegistration {
    /// Entity key; registrations sharing it are versions of one entity.
    pub key: String,
    pub title: String,
    /// Root directory of the tree.
    pub path: PathBuf,
    /// Version the whole tree documents. Without one, version directories
    /// are discovered below each language root.
    pub version: Option<String>,
    /// Marks this registration's version as the stable one.
    pub stable: bool,
}

/// Configuration for [`Manifest`].
#[derive(Clone, Debug)]
pub struct ManifestConfig {
    pub entities: Vec<EntityRegistration>,
    /// URL prefix of all documentation links (e.g. `dev/docs`).
    pub link_base: String,
    /// Directory names recognised as language roots.
    pub languages: Vec<String>,
    /// Language of trees without language directories.
    pub default_language: String,
    /// Version label of trees without version directories.
    pub default_version: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            link_base: "docs".to_owned(),
            languages: vec!["en".to_owned()],
            default_language: "en".to_owned(),
            default_version: "master".to_owned(),
        }
    }
}

/// Immutable snapshot of every entity, language, version and page.
#[derive(Debug)]
pub struct ManifestState {
    link_base: String,
    entities: Vec<Entity>,
    /// `"<language>/<entity-key>"` -> (entity index, language index).
    prefixes: HashMap<String, (usize, usize)>,
    warnings: Vec<ScanWarning>,
}

impl ManifestState {
    fn new(link_base: String, entities: Vec<Entity>, warnings: Vec<ScanWarning>) -> Self {
        let mut prefixes = HashMap::new();
        for (entity_idx, entity) in entities.iter().enumerate() {
            for (language_idx, language) in entity.languages().iter().enumerate() {
                prefixes.insert(
                    format!("{}/{}", language.language(), entity.key()),
                    (entity_idx, language_idx),
                );
            }
        }
        Self {
            link_base,
            entities,
            prefixes,
            warnings,
        }
    }

    fn empty(link_base: String) -> Self {
        Self::new(link_base, Vec::new(), Vec::new())
    }

    pub fn link_base(&self) -> &str {
        &self.link_base
    }

    /// Entities in registration order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, key: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.key() == key)
    }

    /// Warnings collected while this snapshot was built.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Number of pages across all entities, languages and versions.
    pub fn page_count(&self) -> usize {
        self.entities
            .iter()
            .flat_map(Entity::languages)
            .flat_map(EntityLanguage::versions)
            .map(|v| v.pages().len())
            .sum()
    }

    /// Resolve a page's owner key to its entity language.
    pub fn owner_of(&self, owner: &PageOwner) -> Option<&EntityLanguage> {
        self.entity(&owner.entity_key)?.language(&owner.language)
    }

    /// Strip the link base, when present, from a trimmed URL path.
    fn strip_link_base<'p>(&self, path: &'p str) -> &'p str {
        let base = self.link_base.trim_matches('/');
        if base.is_empty() {
            return path;
        }
        if path == base {
            return "";
        }
        path.strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }

    /// Find the page a URL path points to.
    fn resolve(self: &Arc<Self>, url_path: &str) -> Option<PageMatch> {
        let path = self.strip_link_base(url_path.trim_matches('/'));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let (consumed, entity, language) = (2..=segments.len()).rev().find_map(|n| {
            self.prefixes
                .get(&segments[..n].join("/"))
                .map(|&(entity, language)| (n, entity, language))
        })?;
        let entity_language = &self.entities[entity].languages()[language];

        let mut rest = &segments[consumed..];
        let (version, explicit_version) = match rest.first() {
            Some(first) if entity_language.has_version(first) => {
                rest = &rest[1..];
                ((*first).to_owned(), true)
            }
            _ => (entity_language.default_version().to_owned(), false),
        };

        let relative_link = if rest.is_empty() {
            "/".to_owned()
        } else {
            format!("{}/", rest.join("/"))
        };

        let page = entity_language.page_in(&version, &relative_link)?.clone();
        Some(PageMatch {
            state: Arc::clone(self),
            entity,
            language,
            version,
            explicit_version,
            page,
        })
    }
}

/// A resolved URL: the page plus where it sits in the manifest.
///
/// Holds its own copy of the page so that reading the page content (which
/// fills in title and summary from metadata) leaves the shared snapshot
/// untouched.
#[derive(Clone, Debug)]
pub struct PageMatch {
    state: Arc<ManifestState>,
    entity: usize,
    language: usize,
    version: String,
    explicit_version: bool,
    page: Page,
}

impl PageMatch {
    /// Snapshot the page was resolved in.
    pub fn state(&self) -> &Arc<ManifestState> {
        &self.state
    }

    pub fn entity(&self) -> &Entity {
        &self.state.entities[self.entity]
    }

    pub fn language(&self) -> &EntityLanguage {
        &self.entity().languages()[self.language]
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether the URL named the version (rather than falling back to the
    /// stable one).
    pub fn is_explicit_version(&self) -> bool {
        self.explicit_version
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// How the matched version relates to the entity's stable version.
    pub fn version_status(&self) -> Option<VersionStatus> {
        self.entity().classify(&self.version)
    }

    pub fn link(&self) -> String {
        self.page.link(self.language())
    }

    pub fn breadcrumb_title(&self, divider: &str) -> String {
        self.page.breadcrumb_title(self.language(), divider)
    }

    /// Read the page's markdown, see [`Page::markdown`].
    pub fn markdown(&mut self, storage: &dyn Storage, remove_metadata: bool) -> Option<String> {
        self.page.markdown(storage, remove_metadata)
    }

    /// Render the page, see [`Page::render`].
    pub fn render(&mut self, storage: &dyn Storage) -> Option<RenderResult> {
        let language = &self.state.entities[self.entity].languages()[self.language];
        self.page.render(storage, language)
    }

    /// Render the page to HTML, see [`Page::html`].
    pub fn html(&mut self, storage: &dyn Storage) -> Option<String> {
        let language = &self.state.entities[self.entity].languages()[self.language];
        self.page.html(storage, language)
    }
}

/// Index of all registered documentation.
///
/// Built lazily on first use and cached until [`invalidate`](Self::invalidate)
/// or [`force_rebuild`](Self::force_rebuild).
pub struct Manifest {
    storage: Arc<dyn Storage>,
    config: ManifestConfig,
    /// Mutex for serializing rebuilds.
    rebuild_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current_state: RwLock<Arc<ManifestState>>,
    state_valid: AtomicBool,
}

impl Manifest {
    pub fn new(storage: Arc<dyn Storage>, config: ManifestConfig) -> Self {
        let initial_state = Arc::new(ManifestState::empty(config.link_base.clone()));
        Self {
            storage,
            config,
            rebuild_lock: Mutex::new(()),
            current_state: RwLock::new(initial_state),
            state_valid: AtomicBool::new(false),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn config(&self) -> &ManifestConfig {
        &self.config
    }

    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    fn snapshot(&self) -> Arc<ManifestState> {
        Arc::clone(&self.current_state.read().unwrap())
    }

    /// Current snapshot, building it first if needed.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn state(&self) -> Arc<ManifestState> {
        self.build(false)
    }

    /// Build the manifest unless a valid snapshot exists and `force` is
    /// false.
    ///
    /// Uses double-checked locking: concurrent callers wait for one rebuild
    /// and then share its result.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn build(&self, force: bool) -> Arc<ManifestState> {
        if !force && self.state_valid.load(Ordering::Acquire) {
            return self.snapshot();
        }

        let _guard = self.rebuild_lock.lock().unwrap();

        if !force && self.state_valid.load(Ordering::Acquire) {
            return self.snapshot();
        }

        let started = Instant::now();
        let (entities, warnings) = Scanner::new(self.storage.as_ref(), &self.config).scan();
        let state = Arc::new(ManifestState::new(
            self.config.link_base.clone(),
            entities,
            warnings,
        ));
        tracing::info!(
            entities = state.entities().len(),
            pages = state.page_count(),
            warnings = state.warnings().len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Built documentation manifest"
        );

        *self.current_state.write().unwrap() = Arc::clone(&state);
        self.state_valid.store(true, Ordering::Release);

        state
    }

    /// Rebuild from storage now, regardless of cache state.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn force_rebuild(&self) -> Arc<ManifestState> {
        self.build(true)
    }

    /// Mark the snapshot stale; the next access rebuilds.
    ///
    /// Readers holding an `Arc<ManifestState>` keep using it.
    pub fn invalidate(&self) {
        self.state_valid.store(false, Ordering::Release);
    }

    /// Resolve a URL path (with or without the link base) to a page.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn get_page(&self, url_path: &str) -> Option<PageMatch> {
        self.state().resolve(url_path)
    }
}
