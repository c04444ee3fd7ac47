//! Identity records stored in the extended attribute of long-name files.
//!
//! A long name keeps only a prefix of the mangled name, so the full identity
//! is written out-of-band. The payload is a CBOR array:
//!
//! ```text
//! [ version, name (bytes), key (bytes), snapshot, hash, pool ]
//! ```
//!
//! where `snapshot` is the text `"head"` / `"snapdir"` or an unsigned
//! sequence number. The producing format version is always recorded, since a
//! directory may hold records written under different versions.

use crate::error::{CodecError, CodecResult};
use crate::identity::{ObjectIdentity, Snapshot};
use crate::version::FormatVersion;
use ciborium::value::{Integer, Value};

const RECORD_FIELDS: usize = 6;

/// Out-of-band identity record of a long-name file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Format version the long name was derived under.
    pub version: FormatVersion,
    /// The full identity.
    pub identity: ObjectIdentity,
}

impl IdentityRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(identity: ObjectIdentity, version: FormatVersion) -> Self {
        Self { version, identity }
    }

    /// Serializes the record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::RecordEncoding`] if CBOR serialization fails.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let id = &self.identity;
        let snapshot = match id.snapshot {
            Snapshot::Head => Value::Text("head".into()),
            Snapshot::SnapDir => Value::Text("snapdir".into()),
            Snapshot::Seq(seq) => Value::Integer(seq.into()),
        };
        let value = Value::Array(vec![
            Value::Integer(self.version.tag().into()),
            Value::Bytes(id.name.clone()),
            Value::Bytes(id.key.clone()),
            snapshot,
            Value::Integer(id.hash.into()),
            Value::Integer(id.pool.into()),
        ]);

        let mut out = Vec::with_capacity(id.name.len() + id.key.len() + 32);
        ciborium::ser::into_writer(&value, &mut out)
            .map_err(|e| CodecError::record_encoding(e.to_string()))?;
        Ok(out)
    }

    /// Parses a serialized record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidRecord`] if the bytes are not a record,
    /// or [`CodecError::UnsupportedVersion`] for an unknown version tag.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let value: Value = ciborium::de::from_reader(bytes)
            .map_err(|e| CodecError::invalid_record(e.to_string()))?;
        let Value::Array(items) = value else {
            return Err(CodecError::invalid_record("record is not an array"));
        };
        let [version, name, key, snapshot, hash, pool]: [Value; RECORD_FIELDS] =
            items.try_into().map_err(|items: Vec<Value>| {
                CodecError::invalid_record(format!(
                    "expected {RECORD_FIELDS} elements, found {}",
                    items.len()
                ))
            })?;

        let version = FormatVersion::from_tag(int_field(version, "version")?)?;
        let snapshot = match snapshot {
            Value::Text(token) if token == "head" => Snapshot::Head,
            Value::Text(token) if token == "snapdir" => Snapshot::SnapDir,
            Value::Integer(seq) => Snapshot::Seq(
                u64::try_from(seq).map_err(|_| CodecError::invalid_record("snapshot out of range"))?,
            ),
            _ => return Err(CodecError::invalid_record("invalid snapshot")),
        };

        Ok(Self {
            version,
            identity: ObjectIdentity {
                name: bytes_field(name, "name")?,
                key: bytes_field(key, "key")?,
                snapshot,
                hash: int_field(hash, "hash")?,
                pool: int_field(pool, "pool")?,
            },
        })
    }
}

fn bytes_field(value: Value, field: &str) -> CodecResult<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        _ => Err(CodecError::invalid_record(format!("{field} is not a byte string"))),
    }
}

fn int_field<T>(value: Value, field: &str) -> CodecResult<T>
where
    T: TryFrom<Integer>,
{
    match value {
        Value::Integer(n) => T::try_from(n)
            .map_err(|_| CodecError::invalid_record(format!("{field} out of range"))),
        _ => Err(CodecError::invalid_record(format!("{field} is not an integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrip() {
        let id = ObjectIdentity::new(vec![b'A'; 1024])
            .with_key("k\0")
            .with_snapshot(Snapshot::Seq(99))
            .with_hash(0xFFFF_FFFF)
            .with_pool(i64::MIN);
        let record = IdentityRecord::new(id, FormatVersion::V2);
        let bytes = record.to_bytes().unwrap();
        assert_eq!(IdentityRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn record_keeps_version() {
        for version in FormatVersion::ALL {
            let record = IdentityRecord::new(ObjectIdentity::new("x"), version);
            let decoded = IdentityRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
            assert_eq!(decoded.version, version);
        }
    }

    #[test]
    fn raw_name_is_not_a_record() {
        let err = IdentityRecord::from_bytes(b"AAAASUFFIX").unwrap_err();
        assert!(matches!(err, CodecError::InvalidRecord { .. }));
    }

    #[test]
    fn wrong_arity_rejected() {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&Value::Array(vec![Value::Integer(2.into())]), &mut bytes)
            .unwrap();
        let err = IdentityRecord::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            CodecError::invalid_record("expected 6 elements, found 1")
        );
    }

    #[test]
    fn unknown_version_rejected() {
        let record = Value::Array(vec![
            Value::Integer(7.into()),
            Value::Bytes(b"n".to_vec()),
            Value::Bytes(Vec::new()),
            Value::Text("head".into()),
            Value::Integer(0.into()),
            Value::Integer((-1).into()),
        ]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&record, &mut bytes).unwrap();
        assert_eq!(
            IdentityRecord::from_bytes(&bytes),
            Err(CodecError::UnsupportedVersion(7))
        );
    }
}
