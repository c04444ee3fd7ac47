//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding mangled names or identity records.
///
/// A mangled name produced by [`crate::encode`] never fails to decode under
/// the same version, so any of these on a name means the caller handed the
/// decoder something it did not produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The name does not contain the number of fields the version requires.
    #[error("expected {expected} fields, found {found}")]
    MissingField {
        /// Number of `_`-separated fields the version requires.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// An escape introducer was followed by an unknown character.
    #[error("malformed escape sequence at byte {position}")]
    MalformedEscape {
        /// Offset of the `\` within the field.
        position: usize,
    },

    /// The name ends with a lone escape introducer.
    #[error("trailing escape introducer")]
    TrailingEscape,

    /// The snapshot field is neither a token nor a decimal sequence.
    #[error("invalid snapshot field: {field:?}")]
    InvalidSnapshot {
        /// The offending field, lossily decoded.
        field: String,
    },

    /// The hash field is not exactly eight uppercase hex digits.
    #[error("invalid hash field: {field:?}")]
    InvalidHash {
        /// The offending field, lossily decoded.
        field: String,
    },

    /// The pool field is neither `none` nor a decimal pool id.
    #[error("invalid pool field: {field:?}")]
    InvalidPool {
        /// The offending field, lossily decoded.
        field: String,
    },

    /// A format version tag is not known to this codec.
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// An identity record could not be encoded.
    #[error("record encoding failed: {message}")]
    RecordEncoding {
        /// Description of the failure.
        message: String,
    },

    /// An identity record is not valid CBOR or has the wrong shape.
    #[error("invalid identity record: {message}")]
    InvalidRecord {
        /// Description of the structural error.
        message: String,
    },
}

impl CodecError {
    pub(crate) fn invalid_snapshot(field: &[u8]) -> Self {
        Self::InvalidSnapshot {
            field: String::from_utf8_lossy(field).into_owned(),
        }
    }

    pub(crate) fn invalid_hash(field: &[u8]) -> Self {
        Self::InvalidHash {
            field: String::from_utf8_lossy(field).into_owned(),
        }
    }

    pub(crate) fn invalid_pool(field: &[u8]) -> Self {
        Self::InvalidPool {
            field: String::from_utf8_lossy(field).into_owned(),
        }
    }

    /// Create a record encoding error.
    pub fn record_encoding(message: impl Into<String>) -> Self {
        Self::RecordEncoding {
            message: message.into(),
        }
    }

    /// Create an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }
}
