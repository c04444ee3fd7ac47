//! CLI command implementations.

pub mod chain;
pub mod common;
pub mod demangle;
pub mod entry;
pub mod inspect;
pub mod mangle;
pub mod verify;
