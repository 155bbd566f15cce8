//! Node storage for the content tree arena

use crate::tree::Priority;
use derive_more::Display;
use std::fmt;

/// Unique identifier for a node within a [`ContentTree`](crate::tree::ContentTree)
///
/// Internally an index into the arena. Ids are invalidated when the root's
/// children are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node always has ID 0
    pub const ROOT: NodeId = NodeId(0);

    pub const fn new(id: usize) -> Self {
        NodeId(id)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Whether a node is a folder or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    /// An internal node whose fields are derived from its children
    #[display(fmt = "Folder")]
    Folder,
    /// A leaf whose size and progress are supplied externally
    #[display(fmt = "File")]
    File,
}

impl NodeKind {
    pub const fn is_folder(self) -> bool {
        matches!(self, NodeKind::Folder)
    }

    pub const fn is_file(self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A single file or folder in the content tree
///
/// Fields are read-only from outside the crate: folder aggregates are only
/// ever written by the propagation code in [`ContentTree`](crate::tree::ContentTree).
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) priority: Priority,
    pub(crate) size: u64,
    pub(crate) total_done: u64,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) file_index: Option<usize>,
}

impl Node {
    pub(crate) fn folder(name: impl Into<String>, parent: Option<NodeId>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Folder,
            priority,
            size: 0,
            total_done: 0,
            parent,
            children: Vec::new(),
            file_index: None,
        }
    }

    pub(crate) fn file(
        name: impl Into<String>,
        size: u64,
        parent: NodeId,
        file_index: usize,
        priority: Priority,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            priority,
            size,
            total_done: 0,
            parent: Some(parent),
            children: Vec::new(),
            file_index: Some(file_index),
        }
    }

    /// Display name, with the incomplete suffix already stripped
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Size in bytes. For folders, the sum over non-ignored children.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Completed bytes, never above [`size`](Self::size)
    pub fn total_done(&self) -> u64 {
        self.total_done
    }

    /// Completed fraction in `0.0..=1.0`; 0 for empty nodes
    pub fn progress(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.total_done as f64 / self.size as f64
    }

    /// Bytes still to download; 0 when the node is ignored
    pub fn remaining(&self) -> u64 {
        if self.priority.is_ignored() {
            return 0;
        }
        self.size - self.total_done
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in display order (always empty for files)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position of the file in the torrent's file list
    pub fn file_index(&self) -> Option<usize> {
        self.file_index
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{}] {}/{} bytes",
            self.name, self.kind, self.priority, self.total_done, self.size
        )
    }
}
