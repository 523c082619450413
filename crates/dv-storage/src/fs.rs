//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for listing directories and reading documents from
//! the local filesystem.

use std::fs;
use std::path::Path;

use crate::storage::{Entry, EntryKind, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Stateless: every call opens, reads and releases its own handles. Paths are
/// used as given, `..` components included, since they come from configuration
/// and scanning rather than from request URLs. Symlinks are followed, so a
/// symlinked directory lists as a directory and a broken symlink is reported
/// as a file that fails to read.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl FsStorage {
    /// Create a new filesystem storage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn io_error(err: std::io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        let entries = fs::read_dir(dir).map_err(|e| Self::io_error(e, dir))?;

        let mut listed = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            // `fs::metadata` follows symlinks; a dangling link falls back to "file".
            let kind = if fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            listed.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
            });
        }

        Ok(listed)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        fs::read_to_string(path).map_err(|e| Self::io_error(e, path))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::storage::StorageErrorKind;

    #[test]
    fn test_list_returns_files_and_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Home").unwrap();
        fs::create_dir(temp_dir.path().join("en")).unwrap();

        let mut entries = FsStorage::new().list(temp_dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "en");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].name, "index.md");
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[1].path, temp_dir.path().join("index.md"));
    }

    #[test]
    fn test_list_missing_dir() {
        let err = FsStorage::new()
            .list(Path::new("/nonexistent/dv-docs"))
            .unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_list_and_read_through_parent_components() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("site")).unwrap();
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        fs::write(temp_dir.path().join("docs/index.md"), "# Home").unwrap();
        let docs = temp_dir.path().join("site/../docs");
        let storage = FsStorage::new();

        let entries = storage.list(&docs).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "index.md");
        assert_eq!(storage.read(&entries[0].path).unwrap(), "# Home");
    }

    #[test]
    fn test_read_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("guide.md");
        fs::write(&path, "# Guide\n\nContent.").unwrap();

        let content = FsStorage::new().read(&path).unwrap();

        assert_eq!(content, "# Guide\n\nContent.");
    }

    #[test]
    fn test_read_missing_file() {
        let path = PathBuf::from("/nonexistent/dv-docs/guide.md");

        let err = FsStorage::new().read(&path).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.path, Some(path));
    }

    #[test]
    fn test_read_non_utf8_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = FsStorage::new().read(&path).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidData);
    }
}
