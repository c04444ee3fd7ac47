//! # LFN Core
//!
//! Long-file-name index for object stores that keep one file per object.
//!
//! This crate provides:
//! - Short/long placement of mangled names under a length budget
//! - Collision chains of `<prefix>_<serial>_long` files, told apart by an
//!   identity record in an extended attribute
//! - Orphan healing during lookup and chain compaction on removal
//! - Translation of any on-disk name back to its identity
//!
//! Directory access goes through [`lfn_storage::DirBackend`]; name encoding
//! comes from [`lfn_codec`].
//!
//! ## Example
//!
//! ```rust
//! use lfn_codec::{FormatVersion, ObjectIdentity};
//! use lfn_core::{IndexConfig, NameIndex};
//! use lfn_storage::InMemoryDirBackend;
//! use std::path::Path;
//!
//! let config = IndexConfig::new().format_version(FormatVersion::V3);
//! let index = NameIndex::new(InMemoryDirBackend::new(), config).unwrap();
//!
//! let id = ObjectIdentity::new("rbd_data.1").with_pool(3);
//! let created = index.create(Path::new("/objects"), &id).unwrap();
//! assert_eq!(index.translate(Path::new("/objects"), created.name.as_bytes()).unwrap(), id);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod index;
mod long_name;
mod stats;

pub use config::{IndexConfig, DEFAULT_ATTR_NAME};
pub use error::{CoreError, CoreResult};
pub use index::{NameIndex, Placement, Resolved, SlotInfo, SlotState};
pub use long_name::{is_long_name, LongName};
pub use stats::{IndexStats, StatsSnapshot};
