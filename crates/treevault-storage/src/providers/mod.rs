//! Mirror implementations.

pub mod local;

pub use local::LocalDiskMirror;
