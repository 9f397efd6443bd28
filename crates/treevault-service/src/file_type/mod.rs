//! File type registry.

pub mod registry;
pub mod service;

pub use registry::FileTypeRegistry;
pub use service::FileTypeService;
