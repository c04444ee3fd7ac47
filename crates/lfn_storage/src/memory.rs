//! In-memory directory backend for testing.

use crate::backend::DirBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

type Attrs = BTreeMap<String, Vec<u8>>;

/// An in-memory directory backend.
///
/// Files are keyed by full path and carry a map of attributes. Directories
/// are implicit. Access to a directory can be revoked with
/// [`InMemoryDirBackend::deny`] to exercise permission failures, which a
/// real file system will not produce when tests run as root.
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use lfn_storage::{DirBackend, InMemoryDirBackend};
/// use std::path::Path;
///
/// let backend = InMemoryDirBackend::new();
/// backend.create_exclusive(Path::new("/d/obj")).unwrap();
/// assert!(backend.exists(Path::new("/d/obj")).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirBackend {
    files: RwLock<BTreeMap<PathBuf, Attrs>>,
    denied: RwLock<HashSet<PathBuf>>,
}

impl InMemoryDirBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation on entries of `dir` fail with
    /// `PermissionDenied`.
    pub fn deny(&self, dir: impl Into<PathBuf>) {
        self.denied.write().insert(dir.into());
    }

    /// Restores access to `dir`.
    pub fn allow(&self, dir: &Path) {
        self.denied.write().remove(dir);
    }

    /// Returns every file path, sorted.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }

    /// Returns the attributes of a file, if it exists.
    #[must_use]
    pub fn attrs(&self, path: &Path) -> Option<BTreeMap<String, Vec<u8>>> {
        self.files.read().get(path).cloned()
    }

    fn check_access(&self, path: &Path) -> StorageResult<()> {
        let denied = self.denied.read();
        if path.parent().is_some_and(|dir| denied.contains(dir)) {
            return Err(StorageError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn not_found(path: &Path) -> StorageError {
        StorageError::NotFound {
            path: path.to_path_buf(),
        }
    }
}

impl DirBackend for InMemoryDirBackend {
    fn create_exclusive(&self, path: &Path) -> StorageResult<()> {
        self.check_access(path)?;
        let mut files = self.files.write();
        if files.contains_key(path) {
            return Err(StorageError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        files.insert(path.to_path_buf(), Attrs::new());
        Ok(())
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        self.check_access(path)?;
        Ok(self.files.read().contains_key(path))
    }

    fn unlink(&self, path: &Path) -> StorageResult<()> {
        self.check_access(path)?;
        self.files
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    fn rename(&self, from: &Path, to: &Path) -> StorageResult<()> {
        self.check_access(from)?;
        self.check_access(to)?;
        let mut files = self.files.write();
        let attrs = files.remove(from).ok_or_else(|| Self::not_found(from))?;
        files.insert(to.to_path_buf(), attrs);
        Ok(())
    }

    fn get_attr(&self, path: &Path, name: &str) -> StorageResult<Option<Vec<u8>>> {
        self.check_access(path)?;
        let files = self.files.read();
        let attrs = files.get(path).ok_or_else(|| Self::not_found(path))?;
        Ok(attrs.get(name).cloned())
    }

    fn set_attr(&self, path: &Path, name: &str, value: &[u8]) -> StorageResult<()> {
        self.check_access(path)?;
        let mut files = self.files.write();
        let attrs = files.get_mut(path).ok_or_else(|| Self::not_found(path))?;
        attrs.insert(name.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove_attr(&self, path: &Path, name: &str) -> StorageResult<bool> {
        self.check_access(path)?;
        let mut files = self.files.write();
        let attrs = files.get_mut(path).ok_or_else(|| Self::not_found(path))?;
        Ok(attrs.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryDirBackend::new();
        assert!(backend.files().is_empty());
    }

    #[test]
    fn memory_create_exclusive_conflicts() {
        let backend = InMemoryDirBackend::new();
        let path = Path::new("/d/a");
        backend.create_exclusive(path).unwrap();
        assert!(backend.create_exclusive(path).unwrap_err().is_already_exists());
    }

    #[test]
    fn memory_rename_moves_attrs_and_replaces() {
        let backend = InMemoryDirBackend::new();
        let a = Path::new("/d/a");
        let b = Path::new("/d/b");
        backend.create_exclusive(a).unwrap();
        backend.create_exclusive(b).unwrap();
        backend.set_attr(a, "user.x", b"from a").unwrap();
        backend.set_attr(b, "user.x", b"from b").unwrap();

        backend.rename(a, b).unwrap();

        assert!(!backend.exists(a).unwrap());
        assert_eq!(backend.get_attr(b, "user.x").unwrap().unwrap(), b"from a");
        assert_eq!(backend.files(), vec![PathBuf::from("/d/b")]);
    }

    #[test]
    fn memory_attr_absent_vs_file_absent() {
        let backend = InMemoryDirBackend::new();
        let path = Path::new("/d/a");
        assert!(backend.get_attr(path, "user.x").unwrap_err().is_not_found());
        backend.create_exclusive(path).unwrap();
        assert_eq!(backend.get_attr(path, "user.x").unwrap(), None);
        assert!(!backend.remove_attr(path, "user.x").unwrap());
    }

    #[test]
    fn memory_denied_directory() {
        let backend = InMemoryDirBackend::new();
        let path = Path::new("/d/a");
        backend.create_exclusive(path).unwrap();
        backend.deny("/d");

        assert!(matches!(
            backend.exists(path),
            Err(StorageError::PermissionDenied { .. })
        ));
        assert!(matches!(
            backend.unlink(path),
            Err(StorageError::PermissionDenied { .. })
        ));
        assert!(backend.attrs(path).is_some());

        backend.allow(Path::new("/d"));
        backend.unlink(path).unwrap();
    }
}
