//! Directory backend trait definition.

use crate::error::StorageResult;
use std::path::Path;

/// File and extended-attribute primitives on one local file system.
///
/// The long-name index never lists directories or decides placement; it only
/// needs these calls, each of which must be atomic on its own. Sequences of
/// them are not, and callers must not assume otherwise.
///
/// # Invariants
///
/// - `create_exclusive` fails with `AlreadyExists` if anything is at `path`
/// - `rename` atomically replaces `to`; no observer sees `to` missing
/// - `get_attr` distinguishes a missing file (`NotFound`) from a missing
///   attribute (`Ok(None)`)
///
/// # Implementors
///
/// - [`super::FileDirBackend`] - real files and `user.*` extended attributes
/// - [`super::InMemoryDirBackend`] - for testing
pub trait DirBackend: Send + Sync {
    /// Creates an empty file, failing if `path` already exists.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the file exists, or another error if
    /// creation fails.
    fn create_exclusive(&self, path: &Path) -> StorageResult<()>;

    /// Returns whether anything exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined, e.g. the
    /// directory is not searchable.
    fn exists(&self, path: &Path) -> StorageResult<bool>;

    /// Removes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no file, or another error if removal
    /// fails.
    fn unlink(&self, path: &Path) -> StorageResult<()>;

    /// Atomically renames `from` to `to`, replacing `to` if present.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `from` does not exist, or another error if the
    /// rename fails.
    fn rename(&self, from: &Path, to: &Path) -> StorageResult<()>;

    /// Reads the extended attribute `name` of `path`.
    ///
    /// Returns `Ok(None)` when the file exists but carries no such attribute.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist, or another error if
    /// the attribute cannot be read.
    fn get_attr(&self, path: &Path, name: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Writes the extended attribute `name` of `path`, replacing any
    /// previous value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist, or another error if
    /// the attribute cannot be written.
    fn set_attr(&self, path: &Path, name: &str, value: &[u8]) -> StorageResult<()>;

    /// Removes the extended attribute `name` of `path`.
    ///
    /// Returns `Ok(false)` if the attribute was not set.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist, or another error if
    /// the attribute cannot be removed.
    fn remove_attr(&self, path: &Path, name: &str) -> StorageResult<bool>;
}
