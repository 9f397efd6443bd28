//! # treevault-core
//!
//! Core crate for TreeVault. Contains the unified error system,
//! configuration schemas, the logical path codec, and the trait that
//! separates the catalog orchestrator from the on-disk mirror.
//!
//! This crate has **no** internal dependencies on other TreeVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
