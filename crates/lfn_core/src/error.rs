//! Error types for the long-file-name index.

use lfn_codec::CodecError;
use lfn_storage::StorageError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for index operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in index operations.
///
/// Nothing here is retried internally. `NotFound` is an ordinary outcome
/// for lookups and removals, not a failure worth logging.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The file system refused access.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path that was accessed.
        path: PathBuf,
    },

    /// The identity has no on-disk representation.
    #[error("object not found: {}", path.display())]
    NotFound {
        /// Where the object would live.
        path: PathBuf,
    },

    /// The identity is already present.
    #[error("object already exists: {}", path.display())]
    AlreadyExists {
        /// Path of the existing file.
        path: PathBuf,
    },

    /// A name handed to the decoder does not follow the format grammar.
    #[error("name format error: {0}")]
    Format(#[from] CodecError),

    /// A long-name file carries an attribute that is not an identity record.
    #[error("corrupt identity record on {}: {source}", path.display())]
    CorruptRecord {
        /// The long-name file.
        path: PathBuf,
        /// Why the record did not parse.
        #[source]
        source: CodecError,
    },

    /// A long-name file has no identity record.
    #[error("long name without identity record: {}", path.display())]
    MissingRecord {
        /// The long-name file.
        path: PathBuf,
    },

    /// Exclusive creation kept losing races with other writers.
    #[error("gave up creating object after {attempts} attempts")]
    CreateContention {
        /// Number of attempts made.
        attempts: u32,
    },

    /// Every serial whose long name fits the length budget is taken.
    #[error("long-name chain is full: {}", path.display())]
    ChainFull {
        /// The last slot of the chain.
        path: PathBuf,
    },

    /// The directory's file system cannot store extended attributes.
    #[error("extended attributes not supported: {}", path.display())]
    XattrUnsupported {
        /// Path that was accessed.
        path: PathBuf,
    },

    /// The index configuration is inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },

    /// Any other file-system failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path that was accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns `true` for [`CoreError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`CoreError::PermissionDenied`].
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { path } => Self::NotFound { path },
            StorageError::AlreadyExists { path } => Self::AlreadyExists { path },
            StorageError::PermissionDenied { path } => Self::PermissionDenied { path },
            StorageError::XattrUnsupported { path } => Self::XattrUnsupported { path },
            StorageError::Io { path, source } => Self::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_taxonomy() {
        let err: CoreError = StorageError::PermissionDenied {
            path: PathBuf::from("/d"),
        }
        .into();
        assert!(err.is_permission_denied());

        let err: CoreError = StorageError::NotFound {
            path: PathBuf::from("/d/x"),
        }
        .into();
        assert!(err.is_not_found());

        let err: CoreError = StorageError::Io {
            path: PathBuf::from("/d/x"),
            source: io::Error::from_raw_os_error(5),
        }
        .into();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[test]
    fn codec_errors_are_format_errors() {
        let err: CoreError = CodecError::TrailingEscape.into();
        assert!(matches!(err, CoreError::Format(_)));
        assert_eq!(err.to_string(), "name format error: trailing escape introducer");
    }
}
