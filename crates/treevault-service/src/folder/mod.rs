//! Folder tree operations.

pub mod tree;

pub use tree::{DeletedSubtree, FolderTree, RenamedFolder};
