//! # LFN Testkit
//!
//! Test utilities for the long-file-name index.
//!
//! This crate provides:
//! - Fixtures for indexes over temporary directories and in-memory backends
//! - Property-based test generators using proptest
//! - Known mangling vectors shared with other implementations
//! - Concurrent workload helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lfn_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_real_directory() {
//!     let Some(fixture) = TestIndex::file() else {
//!         return; // no user xattrs here
//!     };
//!     fixture.index.create(fixture.dir(), &long_identity(1024, 0)).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
pub use vectors::*;
