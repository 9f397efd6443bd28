//! Core traits defined in `treevault-core` and implemented by other crates.

pub mod mirror;

pub use mirror::{FileLocation, MirrorStore};
