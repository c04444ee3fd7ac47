//! Mangled name format versions.

use crate::error::{CodecError, CodecResult};
use std::fmt;

/// On-disk name format version.
///
/// Each version selects an escape table and a field layout. A directory can
/// hold names written under several versions over its lifetime, so the
/// version is also recorded in every long-name identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FormatVersion {
    /// Legacy layout `name_snap_hash`. Only `\` and `/` are escaped, so a
    /// `_` inside the name is ambiguous and is resolved by splitting from
    /// the right.
    V1,
    /// `name_key_snap_hash`, with `_` and NUL escaped everywhere.
    #[default]
    V2,
    /// `name_key_snap_hash_pool`, same escaping as [`FormatVersion::V2`].
    V3,
}

impl FormatVersion {
    /// All known versions, oldest first.
    pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::V3];

    /// Numeric tag stored in identity records.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    /// Parses a numeric tag.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedVersion`] for unknown tags.
    pub fn from_tag(tag: u8) -> CodecResult<Self> {
        match tag {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(CodecError::UnsupportedVersion(other)),
        }
    }

    /// Whether the key field is part of the name.
    #[inline]
    #[must_use]
    pub const fn has_key(self) -> bool {
        !matches!(self, Self::V1)
    }

    /// Whether the pool field is part of the name.
    #[inline]
    #[must_use]
    pub const fn has_pool(self) -> bool {
        matches!(self, Self::V3)
    }

    /// Whether `_` and NUL are escaped inside data fields.
    #[inline]
    #[must_use]
    pub const fn escapes_separator(self) -> bool {
        !matches!(self, Self::V1)
    }

    /// Number of `_`-separated fields in a short name.
    #[inline]
    #[must_use]
    pub const fn field_count(self) -> usize {
        match self {
            Self::V1 => 3,
            Self::V2 => 4,
            Self::V3 => 5,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for version in FormatVersion::ALL {
            assert_eq!(FormatVersion::from_tag(version.tag()).unwrap(), version);
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        assert_eq!(
            FormatVersion::from_tag(9),
            Err(CodecError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn layouts() {
        assert!(!FormatVersion::V1.has_key());
        assert!(FormatVersion::V2.has_key());
        assert!(FormatVersion::V3.has_pool());
        assert_eq!(FormatVersion::V1.field_count(), 3);
        assert_eq!(FormatVersion::V3.field_count(), 5);
    }
}
