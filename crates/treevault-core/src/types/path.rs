//! Conversion between slash-delimited logical paths and segment lists.
//!
//! Logical paths never carry the synthetic root segment: the root folder
//! is the empty path `""`, a folder directly below it is `"docs"`, and so on.

use crate::error::AppError;
use crate::result::AppResult;

/// Name of the synthetic root folder row. Never visible in logical paths.
pub const ROOT_FOLDER_NAME: &str = "root";

/// Pure string transforms for logical paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCodec;

impl PathCodec {
    /// Split a logical path into its segments.
    ///
    /// Leading and trailing separators are ignored and empty segments are
    /// dropped, so `""`, `"/"` and `"//"` all yield the root (no segments).
    pub fn split(path: &str) -> Vec<String> {
        path.trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Join segments back into a logical path. The empty sequence is `""`.
    pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
        segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Append one name to an existing logical path.
    pub fn child(parent: &str, name: &str) -> String {
        if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}/{name}")
        }
    }

    /// Check that a single folder or file name is usable as a path segment
    /// and as a directory entry on disk.
    pub fn validate_segment(name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(AppError::validation(format!(
                "Name '{name}' cannot contain path separators"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::validation("Name cannot contain control characters"));
        }
        if name == "." || name == ".." {
            return Err(AppError::validation(format!("Name '{name}' is reserved")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_separators() {
        assert_eq!(PathCodec::split("/a/b/"), vec!["a", "b"]);
        assert_eq!(PathCodec::split("a//b"), vec!["a", "b"]);
        assert_eq!(PathCodec::split("docs"), vec!["docs"]);
    }

    #[test]
    fn test_split_empty_is_root() {
        assert!(PathCodec::split("").is_empty());
        assert!(PathCodec::split("/").is_empty());
        assert!(PathCodec::split("///").is_empty());
    }

    #[test]
    fn test_join() {
        assert_eq!(PathCodec::join::<&str>(&[]), "");
        assert_eq!(PathCodec::join(&["a", "b", "doc"]), "a/b/doc");
        let owned = vec!["x".to_string()];
        assert_eq!(PathCodec::join(&owned), "x");
    }

    #[test]
    fn test_join_inverts_split() {
        assert_eq!(PathCodec::join(&PathCodec::split("/work/x/y/")), "work/x/y");
    }

    #[test]
    fn test_child() {
        assert_eq!(PathCodec::child("", "a"), "a");
        assert_eq!(PathCodec::child("a/b", "doc"), "a/b/doc");
    }

    #[test]
    fn test_validate_segment() {
        assert!(PathCodec::validate_segment("reports").is_ok());
        assert!(PathCodec::validate_segment("").is_err());
        assert!(PathCodec::validate_segment("  ").is_err());
        assert!(PathCodec::validate_segment("a/b").is_err());
        assert!(PathCodec::validate_segment("a\\b").is_err());
        assert!(PathCodec::validate_segment("..").is_err());
        assert!(PathCodec::validate_segment("line\nbreak").is_err());
        assert!(PathCodec::validate_segment("tab\there").is_err());
        assert!(PathCodec::validate_segment("say \"hi\"").is_ok());
    }
}
