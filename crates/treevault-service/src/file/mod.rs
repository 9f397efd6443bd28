//! File catalog operations.

pub mod catalog;

pub use catalog::{FileCatalog, NewFile, UpdatedFile};
