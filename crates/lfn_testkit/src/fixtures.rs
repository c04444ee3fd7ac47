//! Test fixtures and index helpers.
//!
//! Provides indexes over temporary directories and in-memory backends, and
//! identities that are guaranteed to overflow the short-name budget.

use lfn_codec::ObjectIdentity;
use lfn_core::{IndexConfig, NameIndex};
use lfn_storage::{FileDirBackend, InMemoryDirBackend};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory used by in-memory fixtures.
pub const MEMORY_DIR: &str = "/objects";

/// An index over a temporary directory with automatic cleanup.
pub struct TestIndex {
    /// The index instance.
    pub index: NameIndex<FileDirBackend>,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestIndex {
    /// Creates an index over a fresh temporary directory.
    ///
    /// Returns `None` when the directory's file system does not support
    /// user extended attributes, so callers can skip.
    pub fn file() -> Option<Self> {
        Self::file_with_config(IndexConfig::default())
    }

    /// Like [`TestIndex::file`], with a custom configuration.
    pub fn file_with_config(config: IndexConfig) -> Option<Self> {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        if !FileDirBackend::supports_xattr(temp_dir.path()) {
            return None;
        }
        let index = NameIndex::new(FileDirBackend::new(), config).expect("Invalid test config");
        Some(Self { index, temp_dir })
    }

    /// The directory objects live in.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Names of the entries in the directory, sorted.
    pub fn entries(&self) -> Vec<Vec<u8>> {
        list_dir(self.dir())
    }
}

impl std::ops::Deref for TestIndex {
    type Target = NameIndex<FileDirBackend>;

    fn deref(&self) -> &Self::Target {
        &self.index
    }
}

/// Creates an in-memory index with a custom configuration.
pub fn memory_index(config: IndexConfig) -> NameIndex<InMemoryDirBackend> {
    NameIndex::new(InMemoryDirBackend::new(), config).expect("Invalid test config")
}

/// Directory for in-memory fixtures.
pub fn memory_dir() -> PathBuf {
    PathBuf::from(MEMORY_DIR)
}

/// Configuration whose long names are plain truncations.
///
/// With no digest in the prefix every overflowing name that shares the first
/// `prefix_len` bytes lands in one collision chain.
pub fn colliding_config() -> IndexConfig {
    IndexConfig::new().max_short_name_len(64).digest_hex_len(0)
}

/// An identity whose name is `len` bytes of `x` followed by `tag`.
pub fn long_identity(len: usize, tag: u32) -> ObjectIdentity {
    let mut name = vec![b'x'; len];
    name.extend_from_slice(tag.to_string().as_bytes());
    ObjectIdentity::new(name).with_hash(tag)
}

/// Lists a real directory, returning sorted raw entry names.
pub fn list_dir(dir: &Path) -> Vec<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;

    let mut names: Vec<Vec<u8>> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| {
            entry
                .expect("Failed to read entry")
                .file_name()
                .as_bytes()
                .to_vec()
        })
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_index() {
        let index = memory_index(colliding_config());
        let id = long_identity(80, 1);
        let created = index.create(&memory_dir(), &id).unwrap();
        assert!(created.name.as_bytes().ends_with(b"_0_long"));
    }

    #[test]
    fn test_long_identity_overflows() {
        let index = memory_index(IndexConfig::default());
        assert!(index.placement(&long_identity(1024, 0)).is_long());
        assert!(!index.placement(&long_identity(10, 0)).is_long());
    }

    #[test]
    fn test_file_index() {
        let Some(fixture) = TestIndex::file() else {
            return;
        };
        let id = long_identity(10, 3);
        fixture.create(fixture.dir(), &id).unwrap();
        assert_eq!(fixture.entries().len(), 1);
    }
}
