//! The content tree: files and folders of a torrent with derived folder
//! priority, size and progress
//!
//! Nodes live in an arena owned by [`ContentTree`]; parents are plain
//! [`NodeId`] back references, so ownership only flows from the root down.

mod builder;
mod content;
mod files;
mod model;
mod node;
mod options;
mod priority;
mod traits;

pub use content::{ContentTree, PropagationStats};
pub use model::{CellValue, Column, Row, NO_PROGRESS};
pub use node::{Node, NodeId, NodeKind};
pub use options::{TreeOptions, DEFAULT_INCOMPLETE_SUFFIX};
pub use priority::Priority;
pub use traits::{TraversalOrder, Tree, TreeTraversal, TreeWalker, PATH_SEPARATOR};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        CellValue, Column, ContentTree, Node, NodeId, NodeKind, Priority, PropagationStats,
        TraversalOrder, Tree, TreeOptions, TreeTraversal,
    };
}
