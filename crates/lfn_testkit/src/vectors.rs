//! Known mangling vectors.
//!
//! Every implementation of the on-disk naming scheme must agree on these
//! byte-for-byte, or directories written by one become unreadable to another.

use lfn_codec::{FormatVersion, ObjectIdentity, Snapshot};
use serde::{Deserialize, Serialize};

/// A mangling vector that can be shared across implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManglingVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Format version tag.
    pub version: u8,
    /// Object name (hex-encoded).
    pub name_hex: String,
    /// Placement key (hex-encoded).
    pub key_hex: String,
    /// Snapshot token as it appears in names.
    pub snapshot: String,
    /// Placement hash.
    pub hash: u32,
    /// Pool id.
    pub pool: i64,
    /// Expected mangled name (hex-encoded).
    pub expected_hex: String,
}

impl ManglingVector {
    /// The identity this vector encodes.
    pub fn identity(&self) -> ObjectIdentity {
        let snapshot = match self.snapshot.as_str() {
            "head" => Snapshot::Head,
            "snapdir" => Snapshot::SnapDir,
            seq => Snapshot::Seq(seq.parse().expect("Invalid snapshot in vector")),
        };
        ObjectIdentity::new(hex::decode(&self.name_hex).expect("Invalid name hex"))
            .with_key(hex::decode(&self.key_hex).expect("Invalid key hex"))
            .with_snapshot(snapshot)
            .with_hash(self.hash)
            .with_pool(self.pool)
    }

    /// The format version this vector is encoded under.
    pub fn format_version(&self) -> FormatVersion {
        FormatVersion::from_tag(self.version).expect("Invalid version in vector")
    }

    /// The expected mangled bytes.
    pub fn expected(&self) -> Vec<u8> {
        hex::decode(&self.expected_hex).expect("Invalid expected hex")
    }
}

fn vector(
    id: &str,
    description: &str,
    version: FormatVersion,
    identity: &ObjectIdentity,
    expected: &[u8],
) -> ManglingVector {
    ManglingVector {
        id: id.into(),
        description: description.into(),
        version: version.tag(),
        name_hex: hex::encode(&identity.name),
        key_hex: hex::encode(&identity.key),
        snapshot: identity.snapshot.to_string(),
        hash: identity.hash,
        pool: identity.pool,
        expected_hex: hex::encode(expected),
    }
}

/// Mangling vectors for every format version.
pub fn mangling_vectors() -> Vec<ManglingVector> {
    fn base(name: &[u8]) -> ObjectIdentity {
        ObjectIdentity::new(name).with_hash(0xABAB_ABAB)
    }

    vec![
        vector(
            "v1_escapes",
            "leading dot, slash and backslash; underscore kept",
            FormatVersion::V1,
            &base(b".A/B_\\C.D"),
            b"\\.A\\sB_\\\\C.D_head_ABABABAB",
        ),
        vector(
            "v1_dir_token",
            "leading DIR_ becomes the directory token",
            FormatVersion::V1,
            &base(b"DIR_A"),
            b"\\dA_head_ABABABAB",
        ),
        vector(
            "v1_snapshot_seq",
            "decimal snapshot and zero-padded hash",
            FormatVersion::V1,
            &ObjectIdentity::new("obj")
                .with_snapshot(Snapshot::Seq(42))
                .with_hash(0x1F),
            b"obj_42_0000001F",
        ),
        vector(
            "v2_escapes",
            "NUL and underscore escaped, key field present",
            FormatVersion::V2,
            &base(b".\0A/B_\\C.D").with_key("KEY"),
            b"\\.\\nA\\sB\\u\\\\C.D_KEY_head_ABABABAB",
        ),
        vector(
            "v2_empty_key",
            "empty key still gets its field",
            FormatVersion::V2,
            &base(b"obj"),
            b"obj__head_ABABABAB",
        ),
        vector(
            "v2_snapdir",
            "snapshot directory marker",
            FormatVersion::V2,
            &base(b"obj").with_snapshot(Snapshot::SnapDir),
            b"obj__snapdir_ABABABAB",
        ),
        vector(
            "v3_pool",
            "pool id appended",
            FormatVersion::V3,
            &base(b"obj").with_key("k_1").with_pool(7),
            b"obj_k\\u1_head_ABABABAB_7",
        ),
        vector(
            "v3_no_pool",
            "no-pool sentinel",
            FormatVersion::V3,
            &base(b"obj"),
            b"obj__head_ABABABAB_none",
        ),
    ]
}

/// Serializes all vectors to pretty JSON for export.
pub fn export_vectors_json() -> String {
    serde_json::to_string_pretty(&mangling_vectors()).expect("Failed to serialize vectors")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfn_codec::{decode, encode};

    #[test]
    fn test_vectors_encode() {
        for v in mangling_vectors() {
            let name = encode(&v.identity(), v.format_version());
            assert_eq!(name.as_bytes(), v.expected().as_slice(), "vector {}", v.id);
        }
    }

    #[test]
    fn test_vectors_decode() {
        for v in mangling_vectors() {
            let id = decode(&v.expected(), v.format_version()).unwrap();
            assert_eq!(id, v.identity(), "vector {}", v.id);
        }
    }

    #[test]
    fn test_vectors_json_roundtrip() {
        let json = export_vectors_json();
        let parsed: Vec<ManglingVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), mangling_vectors().len());
        assert_eq!(parsed[0].expected_hex, mangling_vectors()[0].expected_hex);
    }
}
