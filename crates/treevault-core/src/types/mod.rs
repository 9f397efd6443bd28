//! Shared value types.

pub mod path;

pub use path::{PathCodec, ROOT_FOLDER_NAME};
