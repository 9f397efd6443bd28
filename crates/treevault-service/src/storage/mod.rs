//! Catalog and mirror orchestration.

pub mod service;

pub use service::{CreateFileRequest, StorageService, UpdateFileRequest};
