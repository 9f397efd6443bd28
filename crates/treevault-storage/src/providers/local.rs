//! Local filesystem mirror.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;
use treevault_core::traits::mirror::{FileLocation, MirrorStore};

/// Mirrors the folder tree under a root directory on the local filesystem.
///
/// The root directory itself represents the synthetic root folder, so the
/// `root` segment never appears in any path this mirror produces.
#[derive(Debug, Clone)]
pub struct LocalDiskMirror {
    /// Directory standing in for the root folder.
    root: PathBuf,
}

impl LocalDiskMirror {
    /// Create a mirror rooted at the given path, creating the directory if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create mirror root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The mirror root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn remove_file_if_present(&self, path: &Path) -> AppResult<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {}", path.display()),
                e,
            )),
        }
    }
}

#[async_trait]
impl MirrorStore for LocalDiskMirror {
    fn write_path(&self, folder: &[String], file_name: &str) -> PathBuf {
        self.dir_path(folder).join(file_name)
    }

    fn dir_path(&self, folder: &[String]) -> PathBuf {
        folder
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    async fn create_file(&self, location: &FileLocation, data: Bytes) -> AppResult<()> {
        let path = self.write_path(&location.folder, &location.file_name());
        self.ensure_parent(&path).await?;

        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Wrote mirror file");
        Ok(())
    }

    async fn move_file(
        &self,
        old: &FileLocation,
        new: &FileLocation,
        data: Bytes,
    ) -> AppResult<()> {
        if old != new {
            let old_path = self.write_path(&old.folder, &old.file_name());
            if !self.remove_file_if_present(&old_path).await? {
                warn!(path = %old_path.display(), "Previous mirror file was missing");
            }
        }
        self.create_file(new, data).await
    }

    async fn delete_file(&self, location: &FileLocation) -> AppResult<()> {
        let path = self.write_path(&location.folder, &location.file_name());
        if self.remove_file_if_present(&path).await? {
            debug!(path = %path.display(), "Deleted mirror file");
        }
        Ok(())
    }

    async fn create_dir(&self, folder: &[String]) -> AppResult<()> {
        let path = self.dir_path(folder);
        fs::create_dir_all(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", path.display()),
                e,
            )
        })?;
        debug!(path = %path.display(), "Created mirror directory");
        Ok(())
    }

    async fn rename_dir(&self, old: &[String], new: &[String]) -> AppResult<()> {
        let from = self.dir_path(old);
        let to = self.dir_path(new);

        if !fs::try_exists(&from).await.unwrap_or(false) {
            warn!(
                from = %from.display(),
                to = %to.display(),
                "Directory to rename is not mirrored, creating target instead"
            );
            return self.create_dir(new).await;
        }

        self.ensure_parent(&to).await?;
        fs::rename(&from, &to).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to rename {} -> {}", from.display(), to.display()),
                e,
            )
        })?;
        debug!(from = %from.display(), to = %to.display(), "Renamed mirror directory");
        Ok(())
    }

    async fn delete_dir_recursive(&self, folder: &[String]) -> AppResult<()> {
        if folder.is_empty() {
            return Err(AppError::validation("Refusing to delete the mirror root"));
        }

        let path = self.dir_path(folder);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        let target = path.clone();
        let removed = tokio::task::spawn_blocking(move || remove_tree(&target))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Directory deletion task failed", e)
            })?
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete directory: {}", path.display()),
                    e,
                )
            })?;

        debug!(path = %path.display(), entries = removed, "Deleted mirror directory");
        Ok(())
    }
}

/// Remove a directory tree deepest entries first. Returns the number of
/// entries removed.
fn remove_tree(path: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in WalkDir::new(path).contents_first(true) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &str) -> Vec<String> {
        path.split('/').map(String::from).collect()
    }

    async fn mirror() -> (LocalDiskMirror, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LocalDiskMirror::new(dir.path().join("public")).await.unwrap();
        (mirror, dir)
    }

    #[tokio::test]
    async fn test_root_segment_never_on_disk() {
        let (mirror, _dir) = mirror().await;
        let path = mirror.write_path(&segments("a/b"), "doc.txt");
        assert_eq!(path, mirror.root().join("a").join("b").join("doc.txt"));
        assert_eq!(mirror.dir_path(&[]), mirror.root());
    }

    #[tokio::test]
    async fn test_create_and_delete_file() {
        let (mirror, _dir) = mirror().await;
        let location = FileLocation::new(segments("a/b"), "doc", "txt");

        mirror
            .create_file(&location, Bytes::from_static(b"hello"))
            .await
            .unwrap();
        let path = mirror.root().join("a/b/doc.txt");
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        mirror.delete_file(&location).await.unwrap();
        assert!(!path.exists());

        // Deleting again is a no-op.
        mirror.delete_file(&location).await.unwrap();
    }

    #[tokio::test]
    async fn test_move_file_removes_old_location() {
        let (mirror, _dir) = mirror().await;
        let old = FileLocation::new(segments("a"), "doc", "txt");
        let new = FileLocation::new(segments("b"), "doc", "pdf");

        mirror
            .create_file(&old, Bytes::from_static(b"v1"))
            .await
            .unwrap();
        mirror
            .move_file(&old, &new, Bytes::from_static(b"v2"))
            .await
            .unwrap();

        assert!(!mirror.root().join("a/doc.txt").exists());
        assert_eq!(std::fs::read(mirror.root().join("b/doc.pdf")).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_move_file_in_place_rewrites_content() {
        let (mirror, _dir) = mirror().await;
        let location = FileLocation::new(Vec::new(), "doc", "txt");

        mirror
            .create_file(&location, Bytes::from_static(b"v1"))
            .await
            .unwrap();
        mirror
            .move_file(&location, &location, Bytes::from_static(b"v2"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(mirror.root().join("doc.txt")).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_rename_dir_moves_contents() {
        let (mirror, _dir) = mirror().await;
        let location = FileLocation::new(segments("a/b"), "doc", "txt");
        mirror
            .create_file(&location, Bytes::from_static(b"x"))
            .await
            .unwrap();

        mirror
            .rename_dir(&segments("a"), &segments("z"))
            .await
            .unwrap();

        assert!(!mirror.root().join("a").exists());
        assert!(mirror.root().join("z/b/doc.txt").exists());
    }

    #[tokio::test]
    async fn test_rename_missing_dir_creates_target() {
        let (mirror, _dir) = mirror().await;
        mirror
            .rename_dir(&segments("ghost"), &segments("real"))
            .await
            .unwrap();
        assert!(mirror.root().join("real").is_dir());
    }

    #[tokio::test]
    async fn test_delete_dir_recursive() {
        let (mirror, _dir) = mirror().await;
        for path in ["a/b/c", "a/d"] {
            mirror.create_dir(&segments(path)).await.unwrap();
        }
        mirror
            .create_file(
                &FileLocation::new(segments("a/b/c"), "deep", "txt"),
                Bytes::from_static(b"x"),
            )
            .await
            .unwrap();

        mirror.delete_dir_recursive(&segments("a")).await.unwrap();
        assert!(!mirror.root().join("a").exists());
        assert!(mirror.root().exists());

        mirror.delete_dir_recursive(&segments("a")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_root_is_rejected() {
        let (mirror, _dir) = mirror().await;
        let err = mirror.delete_dir_recursive(&[]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
