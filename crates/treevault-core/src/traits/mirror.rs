//! Mirror trait for the on-disk copy of the folder tree.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Where a file lives in the mirror: the folder segments below the synthetic
/// root plus the `<name>.<type>` file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FileLocation {
    /// Folder segments, root-first, never containing the root folder itself.
    pub folder: Vec<String>,
    /// File name without the type suffix.
    pub name: String,
    /// File type, used as the on-disk extension.
    pub file_type: String,
}

impl FileLocation {
    /// Create a new location.
    pub fn new(folder: Vec<String>, name: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            folder,
            name: name.into(),
            file_type: file_type.into(),
        }
    }

    /// The name of the file on disk.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.file_type)
    }
}

/// Best-effort filesystem mirror of the catalog.
///
/// Operations are invoked only after the matching catalog transaction has
/// committed, so an error here means the catalog and the disk have diverged.
/// The [`MirrorStore`] trait is defined here in `treevault-core` and
/// implemented in `treevault-storage`.
#[async_trait]
pub trait MirrorStore: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve the absolute filesystem path for a file in a folder.
    fn write_path(&self, folder: &[String], file_name: &str) -> PathBuf;

    /// Resolve the absolute filesystem path of a folder's directory.
    fn dir_path(&self, folder: &[String]) -> PathBuf;

    /// Write a new file, creating its directory if needed.
    async fn create_file(&self, location: &FileLocation, data: Bytes) -> AppResult<()>;

    /// Move and/or rewrite a file. The old file is removed when its location
    /// differs from the new one, and the new file is always (re)written.
    async fn move_file(&self, old: &FileLocation, new: &FileLocation, data: Bytes)
    -> AppResult<()>;

    /// Delete a file. Missing files are ignored.
    async fn delete_file(&self, location: &FileLocation) -> AppResult<()>;

    /// Create a folder's directory (and any missing parents).
    async fn create_dir(&self, folder: &[String]) -> AppResult<()>;

    /// Move a folder's directory from its old location to its new one.
    async fn rename_dir(&self, old: &[String], new: &[String]) -> AppResult<()>;

    /// Delete a folder's directory, deepest entries first. Missing directories
    /// are ignored.
    async fn delete_dir_recursive(&self, folder: &[String]) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_encodes_type() {
        let location = FileLocation::new(vec!["a".into(), "b".into()], "doc", "txt");
        assert_eq!(location.file_name(), "doc.txt");
    }
}
