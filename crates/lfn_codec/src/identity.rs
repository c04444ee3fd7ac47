//! Object identity and mangled name types.

use std::ffi::OsString;
use std::fmt;
use std::os::unix::ffi::OsStringExt;

/// Pool identifier meaning "no pool".
pub const NO_POOL: i64 = -1;

/// Snapshot marker of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Snapshot {
    /// The live object, no snapshot.
    #[default]
    Head,
    /// The per-object snapshot directory.
    SnapDir,
    /// A numbered snapshot.
    Seq(u64),
}

impl Snapshot {
    /// Returns `true` for the live object.
    #[inline]
    #[must_use]
    pub const fn is_head(&self) -> bool {
        matches!(self, Self::Head)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::SnapDir => f.write_str("snapdir"),
            Self::Seq(seq) => write!(f, "{seq}"),
        }
    }
}

/// Logical identity of a stored object.
///
/// Two identities are the same object iff all five fields are equal. The
/// mangled name is only a derived representation; when a long name is in
/// play, comparing identities is the only way to tell a true match from a
/// prefix collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentity {
    /// Object name, arbitrary bytes including NUL.
    pub name: Vec<u8>,
    /// Placement key. Empty means the name is used for placement.
    pub key: Vec<u8>,
    /// Snapshot marker.
    pub snapshot: Snapshot,
    /// Placement hash, opaque to this layer.
    pub hash: u32,
    /// Pool identifier, [`NO_POOL`] when unset.
    pub pool: i64,
}

impl ObjectIdentity {
    /// Creates a head identity with an empty key, zero hash and no pool.
    #[must_use]
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            key: Vec::new(),
            snapshot: Snapshot::Head,
            hash: 0,
            pool: NO_POOL,
        }
    }

    /// Sets the placement key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the snapshot marker.
    #[must_use]
    pub const fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Sets the placement hash.
    #[must_use]
    pub const fn with_hash(mut self, hash: u32) -> Self {
        self.hash = hash;
        self
    }

    /// Sets the pool identifier.
    #[must_use]
    pub const fn with_pool(mut self, pool: i64) -> Self {
        self.pool = pool;
        self
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{:08X}/{}",
            String::from_utf8_lossy(&self.name).escape_debug(),
            String::from_utf8_lossy(&self.key).escape_debug(),
            self.snapshot,
            self.hash,
            self.pool
        )
    }
}

/// A file-system legal name derived from an [`ObjectIdentity`].
///
/// Stored as raw bytes: version 1 leaves non-ASCII bytes untouched, so a
/// mangled name is not necessarily UTF-8.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MangledName(Vec<u8>);

impl MangledName {
    /// Wraps raw bytes as a mangled name.
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the name as `&str` when it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the name is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts into an `OsString` for use as a path component.
    #[must_use]
    pub fn into_os_string(self) -> OsString {
        OsString::from_vec(self.0)
    }

    /// Consumes the name, returning the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for MangledName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MangledName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MangledName({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for MangledName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let id = ObjectIdentity::new("obj")
            .with_key("k")
            .with_snapshot(Snapshot::Seq(7))
            .with_hash(0xDEAD_BEEF)
            .with_pool(3);

        assert_eq!(id.name, b"obj");
        assert_eq!(id.key, b"k");
        assert_eq!(id.snapshot, Snapshot::Seq(7));
        assert_eq!(id.hash, 0xDEAD_BEEF);
        assert_eq!(id.pool, 3);
    }

    #[test]
    fn equality_covers_every_field() {
        let base = ObjectIdentity::new("obj").with_hash(1);
        assert_eq!(base, base.clone());
        assert_ne!(base, base.clone().with_key("k"));
        assert_ne!(base, base.clone().with_snapshot(Snapshot::SnapDir));
        assert_ne!(base, base.clone().with_hash(2));
        assert_ne!(base, base.clone().with_pool(0));
    }

    #[test]
    fn snapshot_display() {
        assert_eq!(Snapshot::Head.to_string(), "head");
        assert_eq!(Snapshot::SnapDir.to_string(), "snapdir");
        assert_eq!(Snapshot::Seq(42).to_string(), "42");
    }

    #[test]
    fn mangled_name_non_utf8() {
        let name = MangledName::from_bytes(vec![b'a', 0xFF]);
        assert!(name.as_str().is_none());
        assert_eq!(name.len(), 2);
        assert_eq!(name.into_os_string().len(), 2);
    }
}
