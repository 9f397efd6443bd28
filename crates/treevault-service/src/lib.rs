//! # treevault-service
//!
//! Business logic for TreeVault. The closure-table index, folder tree, file
//! catalog and file type registry operate on a caller-supplied connection so
//! that every use case runs in a single catalog transaction;
//! [`StorageService`] sequences those transactions with the filesystem mirror.

pub mod bootstrap;
pub mod file;
pub mod file_type;
pub mod folder;
pub mod hierarchy;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::bootstrap;
pub use file::{FileCatalog, NewFile, UpdatedFile};
pub use file_type::{FileTypeRegistry, FileTypeService};
pub use folder::{DeletedSubtree, FolderTree, RenamedFolder};
pub use hierarchy::{HierarchyIndex, Scope};
pub use storage::{CreateFileRequest, StorageService, UpdateFileRequest};
