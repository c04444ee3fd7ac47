//! File-system backed directory backend.

use crate::backend::DirBackend;
use crate::error::{StorageError, StorageResult};
use crate::xattr;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// A directory backend over the local file system.
///
/// Files are created with `O_CREAT | O_EXCL`, renames use `rename(2)` and
/// attributes are stored as chained `user.*` extended attributes.
///
/// # Durability
///
/// With `sync_dirs` enabled, the parent directory is fsynced after every
/// create, unlink and rename so the namespace change survives a crash.
///
/// # Example
///
/// ```no_run
/// use lfn_storage::{DirBackend, FileDirBackend};
/// use std::path::Path;
///
/// let backend = FileDirBackend::new();
/// let path = Path::new("/srv/objects/obj__head_00000000");
/// backend.create_exclusive(path).unwrap();
/// backend.set_attr(path, "user.lfn.identity", b"...").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileDirBackend {
    sync_dirs: bool,
}

impl FileDirBackend {
    /// Creates a backend without directory fsync.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that fsyncs parent directories after namespace
    /// changes.
    #[must_use]
    pub fn with_sync_dirs(sync_dirs: bool) -> Self {
        Self { sync_dirs }
    }

    /// Returns whether `dir` supports user extended attributes.
    ///
    /// Directories that do not cannot hold long-name records.
    #[must_use]
    pub fn supports_xattr(dir: &Path) -> bool {
        xattr::supported(dir)
    }

    fn sync_parent(&self, path: &Path) -> StorageResult<()> {
        if !self.sync_dirs {
            return Ok(());
        }
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        File::open(parent)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| StorageError::from_io(parent, e))
    }
}

impl DirBackend for FileDirBackend {
    fn create_exclusive(&self, path: &Path) -> StorageResult<()> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| StorageError::from_io(path, e))?;
        self.sync_parent(path)
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from_io(path, e)),
        }
    }

    fn unlink(&self, path: &Path) -> StorageResult<()> {
        fs::remove_file(path).map_err(|e| StorageError::from_io(path, e))?;
        self.sync_parent(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> StorageResult<()> {
        fs::rename(from, to).map_err(|e| StorageError::from_io(from, e))?;
        self.sync_parent(to)
    }

    fn get_attr(&self, path: &Path, name: &str) -> StorageResult<Option<Vec<u8>>> {
        xattr::get(path, name).map_err(|e| StorageError::from_io(path, e))
    }

    fn set_attr(&self, path: &Path, name: &str, value: &[u8]) -> StorageResult<()> {
        xattr::set(path, name, value).map_err(|e| StorageError::from_io(path, e))
    }

    fn remove_attr(&self, path: &Path, name: &str) -> StorageResult<bool> {
        xattr::remove(path, name).map_err(|e| StorageError::from_io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_create_exclusive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("obj");
        let backend = FileDirBackend::new();

        backend.create_exclusive(&path).unwrap();
        assert!(backend.exists(&path).unwrap());

        let err = backend.create_exclusive(&path).unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn file_unlink_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let backend = FileDirBackend::new();
        let err = backend.unlink(&dir.path().join("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn file_rename_replaces_target() {
        let dir = tempdir().unwrap();
        let backend = FileDirBackend::with_sync_dirs(true);
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"from a").unwrap();
        fs::write(&b, b"from b").unwrap();

        backend.rename(&a, &b).unwrap();

        assert!(!backend.exists(&a).unwrap());
        assert_eq!(fs::read(&b).unwrap(), b"from a");
    }

    #[test]
    fn file_attrs() {
        let dir = tempdir().unwrap();
        if !FileDirBackend::supports_xattr(dir.path()) {
            return;
        }
        let backend = FileDirBackend::new();
        let path = dir.path().join("obj");
        backend.create_exclusive(&path).unwrap();

        assert_eq!(backend.get_attr(&path, "user.a").unwrap(), None);
        backend.set_attr(&path, "user.a", b"value").unwrap();
        assert_eq!(
            backend.get_attr(&path, "user.a").unwrap().as_deref(),
            Some(&b"value"[..])
        );
        assert!(backend.remove_attr(&path, "user.a").unwrap());
        assert_eq!(backend.get_attr(&path, "user.a").unwrap(), None);
    }

    #[test]
    fn file_attr_on_missing_file() {
        let dir = tempdir().unwrap();
        let backend = FileDirBackend::new();
        let err = backend
            .get_attr(&dir.path().join("missing"), "user.a")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
