//! Long-form names: `<prefix>_<serial>_long`.

use crate::config::IndexConfig;
use lfn_codec::MangledName;
use sha2::{Digest, Sha256};

const LONG_SUFFIX: &[u8] = b"_long";

/// A long-form name split into its prefix and collision serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LongName {
    prefix: Vec<u8>,
    serial: u32,
}

impl LongName {
    /// Derives serial 0 of the chain for a short name that does not fit.
    ///
    /// The prefix keeps the first `prefix_len` bytes of the short name and
    /// appends hex digits of its SHA-256, so it depends only on the short
    /// name and never on what else is in the directory.
    #[must_use]
    pub fn for_short_name(short: &MangledName, config: &IndexConfig) -> Self {
        let bytes = short.as_bytes();
        let keep = config.prefix_len().min(bytes.len());
        let digest = hex::encode(Sha256::digest(bytes));
        let digest_len = config.digest_hex_len.min(digest.len());

        let mut prefix = Vec::with_capacity(keep + digest_len);
        prefix.extend_from_slice(&bytes[..keep]);
        prefix.extend_from_slice(&digest.as_bytes()[..digest_len]);
        Self { prefix, serial: 0 }
    }

    /// Parses a file name of the form `<prefix>_<serial>_long`.
    #[must_use]
    pub fn parse(name: &[u8]) -> Option<Self> {
        let stem = name.strip_suffix(LONG_SUFFIX)?;
        let split = stem.iter().rposition(|&b| b == b'_')?;
        let digits = &stem[split + 1..];
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        if digits.len() > 1 && digits[0] == b'0' {
            return None;
        }
        let serial = std::str::from_utf8(digits).ok()?.parse().ok()?;
        Some(Self {
            prefix: stem[..split].to_vec(),
            serial,
        })
    }

    /// The digest-derived stem shared by the whole chain.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Position in the collision chain.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    /// Same prefix, another serial.
    #[must_use]
    pub fn with_serial(&self, serial: u32) -> Self {
        Self {
            prefix: self.prefix.clone(),
            serial,
        }
    }

    /// Renders the on-disk file name.
    #[must_use]
    pub fn to_mangled(&self) -> MangledName {
        let serial = self.serial.to_string();
        let mut out = Vec::with_capacity(self.prefix.len() + serial.len() + LONG_SUFFIX.len() + 1);
        out.extend_from_slice(&self.prefix);
        out.push(b'_');
        out.extend_from_slice(serial.as_bytes());
        out.extend_from_slice(LONG_SUFFIX);
        MangledName::from_bytes(out)
    }
}

/// Returns `true` if `name` is a long-form file name.
#[must_use]
pub fn is_long_name(name: &[u8]) -> bool {
    LongName::parse(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfn_codec::{encode, FormatVersion, ObjectIdentity};

    fn long_short_name() -> MangledName {
        encode(&ObjectIdentity::new(vec![b'A'; 1024]), FormatVersion::V1)
    }

    #[test]
    fn prefix_shape() {
        let config = IndexConfig::default();
        let long = LongName::for_short_name(&long_short_name(), &config);
        assert_eq!(long.prefix().len(), 227 + 20);
        assert!(long.prefix()[..227].iter().all(|&b| b == b'A'));
        assert_eq!(long.serial(), 0);

        let name = long.to_mangled();
        assert!(name.as_bytes().ends_with(b"_0_long"));
        assert!(name.len() <= 255);
    }

    #[test]
    fn prefix_is_deterministic_and_content_sensitive() {
        let config = IndexConfig::default();
        let a = LongName::for_short_name(&long_short_name(), &config);
        let b = LongName::for_short_name(&long_short_name(), &config);
        assert_eq!(a, b);

        let other = encode(&ObjectIdentity::new(vec![b'A'; 1025]), FormatVersion::V1);
        let c = LongName::for_short_name(&other, &config);
        assert_eq!(a.prefix()[..227], c.prefix()[..227]);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_digest_prefix_is_truncation() {
        let config = IndexConfig::new().digest_hex_len(0);
        let a = LongName::for_short_name(&long_short_name(), &config);
        assert_eq!(a.prefix(), &vec![b'A'; 227][..]);
    }

    #[test]
    fn parse_roundtrip() {
        let long = LongName::for_short_name(&long_short_name(), &IndexConfig::default()).with_serial(12);
        let parsed = LongName::parse(long.to_mangled().as_bytes()).unwrap();
        assert_eq!(parsed, long);
    }

    #[test]
    fn parse_rejects_other_names() {
        assert!(!is_long_name(b"obj__head_ABABABAB"));
        assert!(!is_long_name(b"obj_long"));
        assert!(!is_long_name(b"obj__long"));
        assert!(!is_long_name(b"obj_01_long"));
        assert!(!is_long_name(b"obj_x_long"));
        assert!(is_long_name(b"obj_0_long"));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn long_names_parse_back(
                short in prop::collection::vec(any::<u8>(), 255..400),
                serial in 0u32..100,
            ) {
                let config = IndexConfig::default();
                let long = LongName::for_short_name(&MangledName::from_bytes(short), &config)
                    .with_serial(serial);
                let name = long.to_mangled();
                prop_assert!(name.len() <= 255);
                prop_assert_eq!(LongName::parse(name.as_bytes()), Some(long));
            }
        }
    }
}
