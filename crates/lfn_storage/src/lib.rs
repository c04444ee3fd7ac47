//! # LFN Storage
//!
//! Directory backends for the long-file-name index.
//!
//! The index needs a handful of primitives on the directory that holds an
//! object: exclusive create, unlink, atomic rename, and get/set/remove of a
//! named extended attribute. This crate defines them as the [`DirBackend`]
//! trait and provides two implementations.
//!
//! ## Design Principles
//!
//! - Backends know nothing about mangled names or identity records
//! - Every primitive is atomic on its own; sequences are the caller's problem
//! - Must be `Send + Sync` for concurrent access
//! - Errors keep the path they happened on
//!
//! ## Available Backends
//!
//! - [`FileDirBackend`] - real files and chained `user.*` attributes
//! - [`InMemoryDirBackend`] - for testing, with simulated permission failures
//!
//! ## Example
//!
//! ```rust
//! use lfn_storage::{DirBackend, InMemoryDirBackend};
//! use std::path::Path;
//!
//! let backend = InMemoryDirBackend::new();
//! let path = Path::new("/objects/obj_head_00000000");
//! backend.create_exclusive(path).unwrap();
//! backend.set_attr(path, "user.lfn.identity", b"record").unwrap();
//! assert_eq!(backend.get_attr(path, "user.lfn.identity").unwrap().unwrap(), b"record");
//! ```

#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
pub mod xattr;

pub use backend::DirBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileDirBackend;
pub use memory::InMemoryDirBackend;
