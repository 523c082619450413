//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Holds an in-memory file tree. Adding a file implicitly creates all of its
/// ancestor directories. Files registered with
/// [`with_unreadable`](Self::with_unreadable) are listed but fail to read,
/// mimicking broken symlinks and permission quirks.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use dv_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("/docs/en/index.md", "# Home")
///     .with_file("/docs/en/guide.md", "# Guide");
///
/// assert_eq!(storage.list(Path::new("/docs/en")).unwrap().len(), 2);
/// assert_eq!(storage.read(Path::new("/docs/en/index.md")).unwrap(), "# Home");
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<PathBuf, Option<String>>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert_file(path.into(), Some(content.into()));
        self
    }

    /// Add a file that is listed but cannot be read.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable(self, path: impl Into<PathBuf>) -> Self {
        self.insert_file(path.into(), None);
        self
    }

    /// Add an (empty) directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert_dir(&path.into());
        self
    }

    /// Replace or add file content after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.insert_file(path.into(), Some(content.into()));
    }

    fn insert_file(&self, path: PathBuf, content: Option<String>) {
        if let Some(parent) = path.parent() {
            self.insert_dir(parent);
        }
        self.files.write().unwrap().insert(path, content);
    }

    fn insert_dir(&self, path: &Path) {
        let mut dirs = self.dirs.write().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        let dirs = self.dirs.read().unwrap();
        if !dirs.contains(dir) {
            let kind = if self.files.read().unwrap().contains_key(dir) {
                StorageErrorKind::NotADirectory
            } else {
                StorageErrorKind::NotFound
            };
            return Err(StorageError::new(kind)
                .with_path(dir)
                .with_backend(BACKEND));
        }

        let child_dirs = dirs
            .iter()
            .filter(|d| d.parent() == Some(dir))
            .map(|d| (d.clone(), EntryKind::Directory));
        let files = self.files.read().unwrap();
        let child_files = files
            .keys()
            .filter(|f| f.parent() == Some(dir))
            .map(|f| (f.clone(), EntryKind::File));

        Ok(child_dirs
            .chain(child_files)
            .map(|(path, kind)| Entry {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path,
                kind,
            })
            .collect())
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        match self.files.read().unwrap().get(path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND)),
            None => Err(StorageError::not_found(path).with_backend(BACKEND)),
        }
    }
}
