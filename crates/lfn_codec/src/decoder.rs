//! Short-name to object identity decoder.

use crate::encoder::{DIR_TOKEN, ESCAPE, HEAD_TOKEN, NO_POOL_TOKEN, SEPARATOR, SNAPDIR_TOKEN};
use crate::error::{CodecError, CodecResult};
use crate::identity::{ObjectIdentity, Snapshot, NO_POOL};
use crate::version::FormatVersion;

/// Decodes a short mangled name produced by [`crate::encode`].
///
/// Fields the version does not carry decode to their defaults: an empty key
/// and [`NO_POOL`].
///
/// # Errors
///
/// Returns a [`CodecError`] if the name does not follow the version's
/// grammar.
pub fn decode(mangled: &[u8], version: FormatVersion) -> CodecResult<ObjectIdentity> {
    let fields = split_fields(mangled, version)?;
    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    let name = unescape(next(), version, true)?;
    let key = if version.has_key() {
        unescape(next(), version, false)?
    } else {
        Vec::new()
    };
    let snapshot = parse_snapshot(next())?;
    let hash = parse_hash(next())?;
    let pool = if version.has_pool() {
        parse_pool(next())?
    } else {
        NO_POOL
    };

    Ok(ObjectIdentity {
        name,
        key,
        snapshot,
        hash,
        pool,
    })
}

/// Splits a name into its escaped fields.
///
/// V1 does not escape `_` inside the name, so only the last two separators
/// are significant. Later versions escape every data `_` and are split left
/// to right on each unescaped one.
fn split_fields(input: &[u8], version: FormatVersion) -> CodecResult<Vec<&[u8]>> {
    let expected = version.field_count();

    if !version.escapes_separator() {
        let mut fields: Vec<&[u8]> = input.rsplitn(expected, |b| *b == SEPARATOR).collect();
        if fields.len() != expected {
            return Err(CodecError::MissingField {
                expected,
                found: fields.len(),
            });
        }
        fields.reverse();
        return Ok(fields);
    }

    let mut fields = Vec::with_capacity(expected);
    let mut start = 0;
    let mut pos = 0;
    while pos < input.len() {
        match input[pos] {
            ESCAPE => pos += 2,
            SEPARATOR => {
                fields.push(&input[start..pos]);
                start = pos + 1;
                pos += 1;
            }
            _ => pos += 1,
        }
    }
    fields.push(&input[start.min(input.len())..]);

    if fields.len() != expected {
        return Err(CodecError::MissingField {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn unescape(field: &[u8], version: FormatVersion, is_name: bool) -> CodecResult<Vec<u8>> {
    let full = version.escapes_separator();
    let mut out = Vec::with_capacity(field.len());
    let mut pos = 0;

    if is_name {
        if field.starts_with(b"\\d") {
            out.extend_from_slice(DIR_TOKEN);
            pos = 2;
        } else if field.starts_with(b"\\.") {
            out.push(b'.');
            pos = 2;
        }
    }

    while pos < field.len() {
        let byte = field[pos];
        if byte != ESCAPE {
            out.push(byte);
            pos += 1;
            continue;
        }
        let Some(&code) = field.get(pos + 1) else {
            return Err(CodecError::TrailingEscape);
        };
        let decoded = match code {
            ESCAPE => ESCAPE,
            b's' => b'/',
            b'u' if full => SEPARATOR,
            b'n' if full => 0,
            _ => return Err(CodecError::MalformedEscape { position: pos }),
        };
        out.push(decoded);
        pos += 2;
    }

    Ok(out)
}

fn parse_snapshot(field: &[u8]) -> CodecResult<Snapshot> {
    match field {
        HEAD_TOKEN => Ok(Snapshot::Head),
        SNAPDIR_TOKEN => Ok(Snapshot::SnapDir),
        digits => {
            let seq: u64 = parse_canonical(digits).ok_or_else(|| CodecError::invalid_snapshot(field))?;
            Ok(Snapshot::Seq(seq))
        }
    }
}

fn parse_hash(field: &[u8]) -> CodecResult<u32> {
    let valid = field.len() == 8
        && field
            .iter()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(b));
    if !valid {
        return Err(CodecError::invalid_hash(field));
    }
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| u32::from_str_radix(s, 16).ok())
        .ok_or_else(|| CodecError::invalid_hash(field))
}

fn parse_pool(field: &[u8]) -> CodecResult<i64> {
    if field == NO_POOL_TOKEN {
        return Ok(NO_POOL);
    }
    match parse_canonical::<i64>(field) {
        Some(pool) if pool != NO_POOL => Ok(pool),
        _ => Err(CodecError::invalid_pool(field)),
    }
}

/// Parses a decimal number, accepting only the form `to_string` produces.
fn parse_canonical<T>(field: &[u8]) -> Option<T>
where
    T: std::str::FromStr + ToString,
{
    let text = std::str::from_utf8(field).ok()?;
    let value: T = text.parse().ok()?;
    (value.to_string() == text).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn roundtrip(id: &ObjectIdentity, version: FormatVersion) {
        let name = encode(id, version);
        assert_eq!(&decode(name.as_bytes(), version).unwrap(), id, "{name:?}");
    }

    #[test]
    fn v1_literal_example() {
        let id = decode(b"\\.A\\sB_\\\\C.D_head_ABABABAB", FormatVersion::V1).unwrap();
        assert_eq!(id.name, b".A/B_\\C.D");
        assert!(id.key.is_empty());
        assert_eq!(id.snapshot, Snapshot::Head);
        assert_eq!(id.hash, 0xABAB_ABAB);
        assert_eq!(id.pool, NO_POOL);
    }

    #[test]
    fn v1_dir_token() {
        let id = decode(b"\\dA_head_ABABABAB", FormatVersion::V1).unwrap();
        assert_eq!(id.name, b"DIR_A");
    }

    #[test]
    fn v2_literal_example() {
        let id = decode(
            b"\\.\\nA\\sB\\u\\\\C.D_KEY_head_ABABABAB",
            FormatVersion::V2,
        )
        .unwrap();
        assert_eq!(id.name, b".\0A/B_\\C.D");
        assert_eq!(id.key, b"KEY");
    }

    #[test]
    fn roundtrips_awkward_names() {
        let names: [&[u8]; 9] = [
            b"",
            b"_",
            b"__",
            b".",
            b"DIR_",
            b"\\d",
            b"\\",
            b"a_b_c_head_00000000",
            b"DIR_.x/\\_\0",
        ];
        for name in names {
            let id = ObjectIdentity::new(name).with_hash(7);
            roundtrip(&id, FormatVersion::V1);
            roundtrip(&id.clone().with_key("k_/\\\0"), FormatVersion::V2);
            roundtrip(&id.clone().with_pool(-9), FormatVersion::V3);
        }
    }

    #[test]
    fn roundtrips_snapshots() {
        for snapshot in [Snapshot::Head, Snapshot::SnapDir, Snapshot::Seq(0), Snapshot::Seq(u64::MAX)] {
            let id = ObjectIdentity::new("obj").with_snapshot(snapshot);
            for version in FormatVersion::ALL {
                roundtrip(&id, version);
            }
        }
    }

    #[test]
    fn missing_fields() {
        assert_eq!(
            decode(b"obj_head", FormatVersion::V1),
            Err(CodecError::MissingField {
                expected: 3,
                found: 2
            })
        );
        assert!(matches!(
            decode(b"obj_head_ABABABAB", FormatVersion::V2),
            Err(CodecError::MissingField { expected: 4, .. })
        ));
        assert!(matches!(
            decode(b"a_b_c_head_ABABABAB", FormatVersion::V2),
            Err(CodecError::MissingField { found: 5, .. })
        ));
    }

    #[test]
    fn bad_escapes() {
        assert_eq!(
            decode(b"a\\x_head_ABABABAB", FormatVersion::V1),
            Err(CodecError::MalformedEscape { position: 1 })
        );
        // \u and \n only exist in later versions.
        assert!(matches!(
            decode(b"a\\u_head_ABABABAB", FormatVersion::V1),
            Err(CodecError::MalformedEscape { .. })
        ));
        // \d is only meaningful at the start of the name.
        assert!(matches!(
            decode(b"a\\d__head_ABABABAB", FormatVersion::V2),
            Err(CodecError::MalformedEscape { .. })
        ));
        assert_eq!(
            decode(b"a\\_head_ABABABAB", FormatVersion::V1),
            Err(CodecError::TrailingEscape)
        );
    }

    #[test]
    fn bad_snapshot_and_hash() {
        assert!(matches!(
            decode(b"a_HEAD_ABABABAB", FormatVersion::V1),
            Err(CodecError::InvalidSnapshot { .. })
        ));
        assert!(matches!(
            decode(b"a_007_ABABABAB", FormatVersion::V1),
            Err(CodecError::InvalidSnapshot { .. })
        ));
        assert!(matches!(
            decode(b"a_head_abababab", FormatVersion::V1),
            Err(CodecError::InvalidHash { .. })
        ));
        assert!(matches!(
            decode(b"a_head_ABAB", FormatVersion::V1),
            Err(CodecError::InvalidHash { .. })
        ));
    }

    #[test]
    fn bad_pool() {
        assert!(matches!(
            decode(b"a__head_ABABABAB_-1", FormatVersion::V3),
            Err(CodecError::InvalidPool { .. })
        ));
        assert!(matches!(
            decode(b"a__head_ABABABAB_x", FormatVersion::V3),
            Err(CodecError::InvalidPool { .. })
        ));
        assert_eq!(
            decode(b"a__head_ABABABAB_none", FormatVersion::V3)
                .unwrap()
                .pool,
            NO_POOL
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
                for version in FormatVersion::ALL {
                    let _ = decode(&bytes, version);
                }
            }

            #[test]
            fn v2_roundtrip(
                name in prop::collection::vec(any::<u8>(), 0..96),
                key in prop::collection::vec(any::<u8>(), 0..16),
                seq in any::<u64>(),
                hash in any::<u32>(),
            ) {
                let id = ObjectIdentity::new(name)
                    .with_key(key)
                    .with_snapshot(Snapshot::Seq(seq))
                    .with_hash(hash);
                let mangled = encode(&id, FormatVersion::V2);
                prop_assert_eq!(decode(mangled.as_bytes(), FormatVersion::V2).unwrap(), id);
            }
        }
    }
}
