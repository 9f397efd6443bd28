//! # treevault-entity
//!
//! Catalog row models for TreeVault. Every struct in this crate represents
//! a database table row or a value object used to insert or change one.
//! Row structs derive `sqlx::FromRow`.

pub mod file;
pub mod file_type;
pub mod folder;
