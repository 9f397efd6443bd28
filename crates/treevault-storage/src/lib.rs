//! # treevault-storage
//!
//! The on-disk mirror of the catalog. A configured root directory stands in
//! for the synthetic root folder; every other folder is a directory and every
//! file is stored as `<name>.<type>` inside its folder's directory.

pub mod providers;

pub use providers::LocalDiskMirror;
