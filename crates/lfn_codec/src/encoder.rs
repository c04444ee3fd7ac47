//! Object identity to short-name encoder.

use crate::identity::{MangledName, ObjectIdentity, Snapshot, NO_POOL};
use crate::version::FormatVersion;

/// Escape introducer.
pub const ESCAPE: u8 = b'\\';
/// Field separator.
pub const SEPARATOR: u8 = b'_';
/// Prefix reserved by the directory layer for its own nodes.
pub const DIR_TOKEN: &[u8] = b"DIR_";
/// Snapshot token for the live object.
pub const HEAD_TOKEN: &[u8] = b"head";
/// Snapshot token for the snapshot directory.
pub const SNAPDIR_TOKEN: &[u8] = b"snapdir";
/// Pool token for [`NO_POOL`].
pub const NO_POOL_TOKEN: &[u8] = b"none";

/// Encodes an identity as a short mangled name.
///
/// Fields the version does not carry (key under V1, pool under V1/V2) are
/// dropped. The result may be longer than any file-system limit; deciding
/// what to do about that is the resolver's job.
#[must_use]
pub fn encode(identity: &ObjectIdentity, version: FormatVersion) -> MangledName {
    let mut encoder = NameEncoder::with_capacity(
        version,
        identity.name.len() + identity.key.len() + 32,
    );

    encoder.push_name(&identity.name);
    if version.has_key() {
        encoder.push_separator();
        encoder.push_escaped(&identity.key);
    }
    encoder.push_separator();
    encoder.push_snapshot(identity.snapshot);
    encoder.push_separator();
    encoder.push_hash(identity.hash);
    if version.has_pool() {
        encoder.push_separator();
        encoder.push_pool(identity.pool);
    }

    encoder.finish()
}

/// Incremental builder for a mangled name.
pub struct NameEncoder {
    version: FormatVersion,
    buffer: Vec<u8>,
}

impl NameEncoder {
    /// Creates an encoder for the given version.
    #[must_use]
    pub fn new(version: FormatVersion) -> Self {
        Self::with_capacity(version, 0)
    }

    /// Creates an encoder with a preallocated buffer.
    #[must_use]
    pub fn with_capacity(version: FormatVersion, capacity: usize) -> Self {
        Self {
            version,
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Appends the object name, protecting a leading `DIR_` or `.`.
    pub fn push_name(&mut self, name: &[u8]) {
        let rest = if let Some(rest) = name.strip_prefix(DIR_TOKEN) {
            self.buffer.extend_from_slice(b"\\d");
            rest
        } else if let Some(rest) = name.strip_prefix(b".") {
            self.buffer.extend_from_slice(b"\\.");
            rest
        } else {
            name
        };
        self.push_escaped(rest);
    }

    /// Appends bytes through the version's escape table.
    pub fn push_escaped(&mut self, data: &[u8]) {
        let full = self.version.escapes_separator();
        for &byte in data {
            match byte {
                ESCAPE => self.buffer.extend_from_slice(b"\\\\"),
                b'/' => self.buffer.extend_from_slice(b"\\s"),
                SEPARATOR if full => self.buffer.extend_from_slice(b"\\u"),
                0 if full => self.buffer.extend_from_slice(b"\\n"),
                other => self.buffer.push(other),
            }
        }
    }

    /// Appends a field separator.
    #[inline]
    pub fn push_separator(&mut self) {
        self.buffer.push(SEPARATOR);
    }

    /// Appends the snapshot field.
    pub fn push_snapshot(&mut self, snapshot: Snapshot) {
        match snapshot {
            Snapshot::Head => self.buffer.extend_from_slice(HEAD_TOKEN),
            Snapshot::SnapDir => self.buffer.extend_from_slice(SNAPDIR_TOKEN),
            Snapshot::Seq(seq) => self.buffer.extend_from_slice(seq.to_string().as_bytes()),
        }
    }

    /// Appends the hash as eight uppercase hex digits.
    pub fn push_hash(&mut self, hash: u32) {
        self.buffer
            .extend_from_slice(format!("{hash:08X}").as_bytes());
    }

    /// Appends the pool field.
    pub fn push_pool(&mut self, pool: i64) {
        if pool == NO_POOL {
            self.buffer.extend_from_slice(NO_POOL_TOKEN);
        } else {
            self.buffer.extend_from_slice(pool.to_string().as_bytes());
        }
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the encoder and returns the name.
    #[must_use]
    pub fn finish(self) -> MangledName {
        MangledName::from_bytes(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &[u8]) -> ObjectIdentity {
        ObjectIdentity::new(name).with_hash(0xABAB_ABAB)
    }

    #[test]
    fn v1_escapes_slash_and_backslash_only() {
        let name = encode(&sample(b".A/B_\\C.D"), FormatVersion::V1);
        assert_eq!(name.as_bytes(), b"\\.A\\sB_\\\\C.D_head_ABABABAB");
    }

    #[test]
    fn v1_dir_token() {
        let name = encode(&sample(b"DIR_A"), FormatVersion::V1);
        assert_eq!(name.as_bytes(), b"\\dA_head_ABABABAB");
    }

    #[test]
    fn v1_ignores_key() {
        let name = encode(&sample(b"obj").with_key("KEY"), FormatVersion::V1);
        assert_eq!(name.as_bytes(), b"obj_head_ABABABAB");
    }

    #[test]
    fn v2_escapes_separator_and_nul() {
        let id = sample(b".\0A/B_\\C.D").with_key("KEY");
        let name = encode(&id, FormatVersion::V2);
        assert_eq!(name.as_bytes(), b"\\.\\nA\\sB\\u\\\\C.D_KEY_head_ABABABAB");
    }

    #[test]
    fn v2_dir_token_with_key() {
        let name = encode(&sample(b"DIR_A").with_key("KEY"), FormatVersion::V2);
        assert_eq!(name.as_bytes(), b"\\dA_KEY_head_ABABABAB");
    }

    #[test]
    fn v2_empty_key_still_emitted() {
        let name = encode(&sample(b"obj"), FormatVersion::V2);
        assert_eq!(name.as_bytes(), b"obj__head_ABABABAB");
    }

    #[test]
    fn key_is_escaped_without_leading_rules() {
        let name = encode(&sample(b"o").with_key(".k_y"), FormatVersion::V2);
        assert_eq!(name.as_bytes(), b"o_.k\\uy_head_ABABABAB");
    }

    #[test]
    fn hash_keeps_leading_zeros() {
        let id = ObjectIdentity::new("x").with_hash(0x1F);
        assert_eq!(
            encode(&id, FormatVersion::V1).as_bytes(),
            b"x_head_0000001F"
        );
    }

    #[test]
    fn snapshot_is_decimal() {
        let id = ObjectIdentity::new("x").with_snapshot(Snapshot::Seq(255));
        assert_eq!(
            encode(&id, FormatVersion::V1).as_bytes(),
            b"x_255_00000000"
        );
        let id = ObjectIdentity::new("x").with_snapshot(Snapshot::SnapDir);
        assert_eq!(
            encode(&id, FormatVersion::V1).as_bytes(),
            b"x_snapdir_00000000"
        );
    }

    #[test]
    fn v3_appends_pool() {
        let id = sample(b"obj").with_pool(12);
        assert_eq!(
            encode(&id, FormatVersion::V3).as_bytes(),
            b"obj__head_ABABABAB_12"
        );
        let id = sample(b"obj");
        assert_eq!(
            encode(&id, FormatVersion::V3).as_bytes(),
            b"obj__head_ABABABAB_none"
        );
    }
}
