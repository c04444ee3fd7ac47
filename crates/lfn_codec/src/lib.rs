//! # LFN Codec
//!
//! Versioned name-mangling codec for the long-file-name index.
//!
//! Object names may contain any byte, including `/`, NUL and the escape
//! character itself. This crate turns an [`ObjectIdentity`] into a name that
//! is legal in a single directory entry, and back:
//!
//! - `encode(identity, version)` is pure and total
//! - `decode(encode(i, v), v) == i` for every identity `v` can represent
//! - names are escaped with a per-version table, fields are joined by `_`
//!
//! Whether the result fits the file system's name limit is not decided here;
//! see `lfn_core` for the long-name protocol that handles overflow.
//!
//! ## Usage
//!
//! ```
//! use lfn_codec::{decode, encode, FormatVersion, ObjectIdentity};
//!
//! let id = ObjectIdentity::new("DIR_A").with_hash(0xABABABAB);
//! let name = encode(&id, FormatVersion::V1);
//! assert_eq!(name.as_bytes(), b"\\dA_head_ABABABAB");
//! assert_eq!(decode(name.as_bytes(), FormatVersion::V1).unwrap(), id);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod identity;
mod record;
mod version;

pub use decoder::decode;
pub use encoder::{encode, NameEncoder, DIR_TOKEN, ESCAPE, SEPARATOR};
pub use error::{CodecError, CodecResult};
pub use identity::{MangledName, ObjectIdentity, Snapshot, NO_POOL};
pub use record::IdentityRecord;
pub use version::FormatVersion;
