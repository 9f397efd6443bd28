//! Closure-table row linking a folder to one of its ancestors.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One `(folder, ancestor, depth)` closure row.
///
/// Every folder has a self-edge at depth 0 and one edge per ancestor at the
/// tree distance to that ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct HierarchyEdge {
    /// The descendant end of the edge.
    pub folder_id: Uuid,
    /// The ancestor end of the edge (equal to `folder_id` for the self-edge).
    pub ancestor_id: Uuid,
    /// Tree distance from the ancestor down to the folder.
    pub depth: i32,
}

impl HierarchyEdge {
    /// Whether this is the depth-0 self-edge.
    pub fn is_self_edge(&self) -> bool {
        self.depth == 0 && self.folder_id == self.ancestor_id
    }
}
