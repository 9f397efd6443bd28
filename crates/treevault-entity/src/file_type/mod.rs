//! File type lookup entities.

pub mod model;

pub use model::FileType;
