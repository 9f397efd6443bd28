//! HTTP request handlers.

pub mod file;
pub mod file_type;
pub mod folder;
pub mod health;
