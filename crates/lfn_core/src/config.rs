//! Index configuration.

use crate::error::{CoreError, CoreResult};
use lfn_codec::FormatVersion;

/// Default extended attribute holding long-name identity records.
pub const DEFAULT_ATTR_NAME: &str = "user.lfn.identity";

/// Length of the cookie closing every long name.
const LONG_COOKIE_LEN: usize = "long".len();
/// Room for the two separators and a serial of at most two digits.
const LONG_EXTRA_LEN: usize = 4;
/// Hex characters available from a SHA-256 digest.
const MAX_DIGEST_HEX_LEN: usize = 64;

/// Configuration for a [`crate::NameIndex`].
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Format version used to encode new names.
    pub format_version: FormatVersion,

    /// Longest short name stored as-is. Anything longer becomes a long name.
    pub max_short_name_len: usize,

    /// Number of hex digest characters in a long-name prefix.
    pub digest_hex_len: usize,

    /// Extended attribute holding identity records.
    pub attr_name: String,

    /// How many slots [`crate::NameIndex::create`] tries when other writers
    /// keep taking them first.
    pub max_create_attempts: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            format_version: FormatVersion::V2,
            max_short_name_len: 254, // NAME_MAX - 1
            digest_hex_len: 20,
            attr_name: DEFAULT_ATTR_NAME.to_owned(),
            max_create_attempts: 16,
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the format version.
    #[must_use]
    pub const fn format_version(mut self, version: FormatVersion) -> Self {
        self.format_version = version;
        self
    }

    /// Sets the short-name length budget.
    #[must_use]
    pub const fn max_short_name_len(mut self, len: usize) -> Self {
        self.max_short_name_len = len;
        self
    }

    /// Sets the number of digest characters in long-name prefixes.
    ///
    /// Zero makes the prefix a plain truncation of the short name, which
    /// turns every shared leading run into a collision. Useful for tests.
    #[must_use]
    pub const fn digest_hex_len(mut self, len: usize) -> Self {
        self.digest_hex_len = len;
        self
    }

    /// Sets the identity record attribute name.
    #[must_use]
    pub fn attr_name(mut self, name: impl Into<String>) -> Self {
        self.attr_name = name.into();
        self
    }

    /// Sets the create retry bound.
    #[must_use]
    pub const fn max_create_attempts(mut self, attempts: u32) -> Self {
        self.max_create_attempts = attempts;
        self
    }

    /// Number of short-name bytes kept at the front of a long name.
    #[must_use]
    pub const fn prefix_len(&self) -> usize {
        (self.max_short_name_len + 1)
            .saturating_sub(self.digest_hex_len + LONG_COOKIE_LEN + LONG_EXTRA_LEN)
    }

    /// Longest long name allowed on disk.
    ///
    /// Serials that would render past this are never used, which caps a
    /// chain at 100 slots.
    #[must_use]
    pub const fn max_long_name_len(&self) -> usize {
        self.max_short_name_len + 1
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> CoreResult<()> {
        if self.digest_hex_len > MAX_DIGEST_HEX_LEN {
            return Err(CoreError::invalid_config(format!(
                "digest_hex_len {} exceeds {MAX_DIGEST_HEX_LEN}",
                self.digest_hex_len
            )));
        }
        if self.prefix_len() == 0 {
            return Err(CoreError::invalid_config(format!(
                "max_short_name_len {} leaves no room for a long-name prefix",
                self.max_short_name_len
            )));
        }
        if self.attr_name.is_empty() || self.attr_name.contains('\0') {
            return Err(CoreError::invalid_config("attr_name must be a non-empty C string"));
        }
        if self.max_create_attempts == 0 {
            return Err(CoreError::invalid_config("max_create_attempts must be at least 1"));
        }
        Ok(())
    }
}
