//! Error types for backend operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during backend operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist.
    #[error("not found: {}", path.display())]
    NotFound {
        /// Path that was accessed.
        path: PathBuf,
    },

    /// Exclusive creation found an existing file.
    #[error("already exists: {}", path.display())]
    AlreadyExists {
        /// Path that was accessed.
        path: PathBuf,
    },

    /// Access to the file or its directory was refused.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path that was accessed.
        path: PathBuf,
    },

    /// The file system does not support extended attributes.
    #[error("extended attributes not supported: {}", path.display())]
    XattrUnsupported {
        /// Path that was accessed.
        path: PathBuf,
    },

    /// Any other I/O failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path that was accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classifies an I/O error raised while operating on `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if let Some(code) = source.raw_os_error() {
            if code == libc::ENOTSUP || code == libc::EOPNOTSUPP {
                return Self::XattrUnsupported { path };
            }
        }
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::Unsupported => Self::XattrUnsupported { path },
            _ => Self::Io { path, source },
        }
    }

    /// Returns `true` for [`StorageError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`StorageError::AlreadyExists`].
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_io_kinds() {
        let path = Path::new("/x");
        assert!(StorageError::from_io(path, io::Error::from(io::ErrorKind::NotFound)).is_not_found());
        assert!(
            StorageError::from_io(path, io::Error::from(io::ErrorKind::AlreadyExists))
                .is_already_exists()
        );
        assert!(matches!(
            StorageError::from_io(path, io::Error::from_raw_os_error(libc::EACCES)),
            StorageError::PermissionDenied { .. }
        ));
        assert!(matches!(
            StorageError::from_io(path, io::Error::from_raw_os_error(libc::EIO)),
            StorageError::Io { .. }
        ));
    }
}
