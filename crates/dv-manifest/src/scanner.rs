//! Discovery of entities, languages, versions and pages in registered trees.
//!
//! Scanning never fails. Anything unexpected becomes a [`ScanWarning`] and
//! the scan carries on with what it could read.

use std::fmt;
use std::path::{Path, PathBuf};

use dv_storage::Storage;

use crate::entity::{Entity, EntityLanguage, VersionRoot};
use crate::manifest::{EntityRegistration, ManifestConfig};
use crate::page::{Page, PageOwner};
use crate::path_helper::{clean_page_name, is_doc_file};
use crate::version::{compare_versions, is_version_label, latest_version, sort_versions};

/// Problem found while scanning documentation trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanWarning {
    /// A registered directory could not be listed. The entity is still
    /// registered, without pages for that version.
    UnreadableRoot {
        entity_key: String,
        path: PathBuf,
        error: String,
    },
    /// More than one registration flagged a different version as stable.
    /// The first one wins.
    MultipleStable {
        entity_key: String,
        kept: String,
        ignored: String,
    },
    /// Two registrations provide the same language and version. The later
    /// one wins.
    DuplicateVersion {
        entity_key: String,
        language: String,
        version: String,
        path: PathBuf,
    },
    /// Two files map to the same URL. The later-scanned file wins.
    DuplicatePage {
        entity_key: String,
        language: String,
        version: String,
        relative_link: String,
        replaced: PathBuf,
        path: PathBuf,
    },
}

impl ScanWarning {
    /// Key of the entity the warning is about.
    pub fn entity_key(&self) -> &str {
        match self {
            Self::UnreadableRoot { entity_key, .. }
            | Self::MultipleStable { entity_key, .. }
            | Self::DuplicateVersion { entity_key, .. }
            | Self::DuplicatePage { entity_key, .. } => entity_key,
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableRoot {
                entity_key,
                path,
                error,
            } => write!(
                f,
                "{entity_key}: cannot read {}: {error}",
                path.display()
            ),
            Self::MultipleStable {
                entity_key,
                kept,
                ignored,
            } => write!(
                f,
                "{entity_key}: version {ignored} is also flagged stable, keeping {kept}"
            ),
            Self::DuplicateVersion {
                entity_key,
                language,
                version,
                path,
            } => write!(
                f,
                "{entity_key}: {language}/{version} registered again by {}",
                path.display()
            ),
            Self::DuplicatePage {
                entity_key,
                language,
                version,
                relative_link,
                replaced,
                path,
            } => write!(
                f,
                "{entity_key}: {language}/{version} page {relative_link} from {} replaces {}",
                path.display(),
                replaced.display()
            ),
        }
    }
}

/// Entity under construction, grouping registrations that share a key.
struct EntityDraft {
    key: String,
    title: String,
    stable: Option<String>,
    languages: Vec<LanguageDraft>,
}

struct LanguageDraft {
    language: String,
    /// Version roots with the index of the registration that produced them.
    roots: Vec<(VersionRoot, usize)>,
}

/// Walks every registration of a [`ManifestConfig`] through a [`Storage`].
pub(crate) struct Scanner<'a> {
    storage: &'a dyn Storage,
    config: &'a ManifestConfig,
    warnings: Vec<ScanWarning>,
}

impl<'a> Scanner<'a> {
    pub fn new(storage: &'a dyn Storage, config: &'a ManifestConfig) -> Self {
        Self {
            storage,
            config,
            warnings: Vec::new(),
        }
    }

    /// Scan all registrations, in configuration order.
    pub fn scan(mut self) -> (Vec<Entity>, Vec<ScanWarning>) {
        let config = self.config;
        let mut drafts: Vec<EntityDraft> = Vec::new();

        for (idx, registration) in config.entities.iter().enumerate() {
            let pos = match drafts.iter().position(|d| d.key == registration.key) {
                Some(pos) => pos,
                None => {
                    drafts.push(EntityDraft {
                        key: registration.key.clone(),
                        title: registration.title.clone(),
                        stable: None,
                        languages: Vec::new(),
                    });
                    drafts.len() - 1
                }
            };
            let draft = &mut drafts[pos];

            let labels = self.scan_registration(idx, registration, draft);
            if registration.stable {
                self.mark_stable(registration, &labels, draft);
            }
        }

        let entities = drafts.into_iter().map(|d| self.finish(d)).collect();
        (entities, self.warnings)
    }

    fn warn(&mut self, warning: ScanWarning) {
        tracing::warn!(entity = warning.entity_key(), "{warning}");
        self.warnings.push(warning);
    }

    fn mark_stable(
        &mut self,
        registration: &EntityRegistration,
        labels: &[String],
        draft: &mut EntityDraft,
    ) {
        let label = registration
            .version
            .clone()
            .or_else(|| latest_version(labels.iter().map(String::as_str)).map(str::to_owned));
        let Some(label) = label else {
            return;
        };
        let Some(kept) = draft.stable.clone() else {
            draft.stable = Some(label);
            return;
        };
        if kept != label {
            self.warn(ScanWarning::MultipleStable {
                entity_key: draft.key.clone(),
                kept,
                ignored: label,
            });
        }
    }

    /// Scan one registration into `draft`. Returns the version labels found.
    fn scan_registration(
        &mut self,
        idx: usize,
        registration: &EntityRegistration,
        draft: &mut EntityDraft,
    ) -> Vec<String> {
        let entries = match self.storage.list(&registration.path) {
            Ok(entries) => entries,
            Err(e) => {
                self.warn(ScanWarning::UnreadableRoot {
                    entity_key: registration.key.clone(),
                    path: registration.path.clone(),
                    error: e.to_string(),
                });
                let label = registration
                    .version
                    .clone()
                    .unwrap_or_else(|| self.config.default_version.clone());
                let root = VersionRoot::new(label.clone(), &registration.path);
                let language = self.config.default_language.clone();
                self.add_root(draft, idx, &language, root, &registration.path);
                return vec![label];
            }
        };

        let mut language_roots: Vec<(String, PathBuf)> = self
            .config
            .languages
            .iter()
            .filter_map(|language| {
                entries
                    .iter()
                    .find(|e| e.is_dir() && e.name == *language)
                    .map(|e| (language.clone(), e.path.clone()))
            })
            .collect();
        if language_roots.is_empty() {
            language_roots.push((
                self.config.default_language.clone(),
                registration.path.clone(),
            ));
        }

        let mut labels = Vec::new();
        for (language, language_root) in language_roots {
            for (label, root_path) in self.version_roots(registration, &language_root) {
                let owner = PageOwner {
                    entity_key: registration.key.clone(),
                    language: language.clone(),
                    version: label.clone(),
                };
                let mut root = VersionRoot::new(label.clone(), &root_path);
                self.scan_dir(&root_path, "", &registration.title, &owner, &mut root);
                self.add_root(draft, idx, &language, root, &registration.path);
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Version roots below a language root, oldest first.
    fn version_roots(
        &mut self,
        registration: &EntityRegistration,
        language_root: &Path,
    ) -> Vec<(String, PathBuf)> {
        if let Some(version) = &registration.version {
            return vec![(version.clone(), language_root.to_path_buf())];
        }

        match self.storage.list(language_root) {
            Ok(entries) => {
                let mut roots: Vec<(String, PathBuf)> = entries
                    .into_iter()
                    .filter(|e| e.is_dir() && is_version_label(&e.name))
                    .map(|e| (e.name, e.path))
                    .collect();
                if !roots.is_empty() {
                    roots.sort_by(|a, b| compare_versions(&a.0, &b.0).then_with(|| a.0.cmp(&b.0)));
                    return roots;
                }
            }
            Err(e) => self.warn(ScanWarning::UnreadableRoot {
                entity_key: registration.key.clone(),
                path: language_root.to_path_buf(),
                error: e.to_string(),
            }),
        }

        vec![(
            self.config.default_version.clone(),
            language_root.to_path_buf(),
        )]
    }

    fn add_root(
        &mut self,
        draft: &mut EntityDraft,
        idx: usize,
        language: &str,
        root: VersionRoot,
        registration_path: &Path,
    ) {
        let pos = match draft.languages.iter().position(|l| l.language == language) {
            Some(pos) => pos,
            None => {
                draft.languages.push(LanguageDraft {
                    language: language.to_owned(),
                    roots: Vec::new(),
                });
                draft.languages.len() - 1
            }
        };
        let roots = &mut draft.languages[pos].roots;

        match roots.iter().position(|(r, _)| r.label() == root.label()) {
            Some(existing) => {
                if roots[existing].1 != idx {
                    let warning = ScanWarning::DuplicateVersion {
                        entity_key: draft.key.clone(),
                        language: language.to_owned(),
                        version: root.label().to_owned(),
                        path: registration_path.to_path_buf(),
                    };
                    self.warn(warning);
                }
                roots[existing] = (root, idx);
            }
            None => roots.push((root, idx)),
        }
    }

    /// Collect pages below `dir` into `root`.
    ///
    /// Entries are visited in case-insensitive name order. Names starting
    /// with `.` or `_` are skipped.
    fn scan_dir(
        &mut self,
        dir: &Path,
        prefix: &str,
        section_title: &str,
        owner: &PageOwner,
        root: &mut VersionRoot,
    ) {
        let mut entries = match self.storage.list(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "Cannot list documentation directory");
                return;
            }
        };
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        for entry in entries {
            if entry.name.starts_with(['.', '_']) {
                tracing::debug!(path = %entry.path.display(), "Skipping hidden entry");
                continue;
            }

            let relative = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if entry.is_dir() {
                let title = clean_page_name(&entry.name, section_title);
                self.scan_dir(&entry.path, &relative, &title, owner, root);
            } else if is_doc_file(&entry.name) {
                let title = clean_page_name(&entry.name, section_title);
                let page = Page::new(owner.clone(), entry.path.clone(), relative, title);
                if let Some(replaced) = root.insert(page) {
                    self.warn(ScanWarning::DuplicatePage {
                        entity_key: owner.entity_key.clone(),
                        language: owner.language.clone(),
                        version: owner.version.clone(),
                        relative_link: replaced.relative_link(),
                        replaced: replaced.path().to_path_buf(),
                        path: entry.path,
                    });
                }
            } else {
                tracing::debug!(path = %entry.path.display(), "Skipping non-documentation file");
            }
        }
    }

    fn finish(&self, draft: EntityDraft) -> Entity {
        let mut versions: Vec<String> = Vec::new();
        for language in &draft.languages {
            for (root, _) in &language.roots {
                if !versions.iter().any(|v| v == root.label()) {
                    versions.push(root.label().to_owned());
                }
            }
        }
        sort_versions(&mut versions);

        let stable = draft
            .stable
            .or_else(|| versions.last().cloned())
            .unwrap_or_else(|| self.config.default_version.clone());

        let languages = draft
            .languages
            .into_iter()
            .map(|language| {
                let mut roots: Vec<VersionRoot> =
                    language.roots.into_iter().map(|(root, _)| root).collect();
                roots.sort_by(|a, b| {
                    compare_versions(a.label(), b.label()).then_with(|| a.label().cmp(b.label()))
                });
                EntityLanguage::new(
                    language.language,
                    draft.key.as_str(),
                    draft.title.as_str(),
                    stable.as_str(),
                    self.config.link_base.as_str(),
                )
                .with_versions(roots)
            })
            .collect();

        Entity::new(draft.key, draft.title, stable, versions, languages)
    }
}
