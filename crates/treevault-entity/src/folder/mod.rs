//! Folder domain entities.

pub mod hierarchy;
pub mod model;

pub use hierarchy::HierarchyEdge;
pub use model::{CreateFolder, Folder};
