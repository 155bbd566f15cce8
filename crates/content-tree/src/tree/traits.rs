//! Read-only navigation over the content tree

use crate::tree::{Node, NodeId, NodeKind};
use std::collections::VecDeque;

/// Separator used in torrent-relative paths
pub const PATH_SEPARATOR: char = '/';

/// Read access to a rooted tree of files and folders
///
/// Implementations provide the primitive accessors; everything else is
/// derived. The root is an invisible container: it never appears in paths.
pub trait Tree {
    /// Get the root node ID (always exists)
    fn root(&self) -> NodeId;

    /// Get a node by its ID, `None` if the ID is invalid
    fn get(&self, id: NodeId) -> Option<&Node>;

    /// Get the parent of a node, `None` for the root
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Direct children in display order
    ///
    /// Empty for files and invalid IDs.
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Count total nodes in the tree, root included
    fn node_count(&self) -> usize;

    /// The `row`-th child of `id`
    ///
    /// Out of range rows give `None`, so a caller holding a stale row count
    /// never panics.
    fn child(&self, id: NodeId, row: usize) -> Option<NodeId> {
        self.children(id).get(row).copied()
    }

    fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    fn is_root(&self, id: NodeId) -> bool {
        id == self.root()
    }

    /// Returns false for invalid IDs
    fn is_file(&self, id: NodeId) -> bool {
        self.get(id)
            .map(|n| n.kind() == NodeKind::File)
            .unwrap_or(false)
    }

    /// Returns false for invalid IDs
    fn is_folder(&self, id: NodeId) -> bool {
        self.get(id)
            .map(|n| n.kind() == NodeKind::Folder)
            .unwrap_or(false)
    }

    fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.name())
    }

    /// Torrent-relative path of a node, joined with [`PATH_SEPARATOR`]
    ///
    /// The root maps to an empty path, as do invalid IDs.
    fn path(&self, id: NodeId) -> String {
        let mut segments: Vec<&str> = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            if self.is_root(node_id) {
                break;
            }
            match self.name(node_id) {
                Some(name) => segments.push(name),
                None => return String::new(),
            }
            current = self.parent(node_id);
        }

        segments.reverse();
        segments.join("/")
    }

    /// Depth of a node (root = 0)
    fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// All ancestors of a node, from parent to root
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            ancestors.push(parent_id);
            current = self.parent(parent_id);
        }
        ancestors
    }

    fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        self.ancestors(descendant).contains(&ancestor)
    }
}

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level
    BreadthFirst,
}

/// Traversal and search helpers, implemented for every [`Tree`]
pub trait TreeTraversal: Tree {
    /// Walk the whole tree from the root
    fn walk(&self, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, self.root(), order)
    }

    /// Walk the subtree rooted at `start`
    fn walk_from(&self, start: NodeId, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, start, order)
    }

    /// All file nodes, in display order
    fn files_in_order(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|&id| self.is_file(id))
            .collect()
    }

    /// All folder nodes except the root, in display order
    fn folders(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|&id| !self.is_root(id) && self.is_folder(id))
            .collect()
    }

    /// Find nodes matching a predicate
    fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|&id| !self.is_root(id) && self.get(id).map(&predicate).unwrap_or(false))
            .collect()
    }

    /// Resolve a torrent-relative path (display names, `/`-separated)
    fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root();
        for segment in path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
            current = self
                .children(current)
                .iter()
                .copied()
                .find(|&id| self.name(id) == Some(segment))?;
        }
        Some(current)
    }

    /// First node with a given name, in pre-order
    fn find_by_name(&self, name: &str) -> Option<NodeId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .find(|&id| !self.is_root(id) && self.name(id) == Some(name))
    }
}

impl<T: Tree> TreeTraversal for T {}

/// Iterator over node IDs in a chosen [`TraversalOrder`]
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    order: TraversalOrder,
    /// Pending nodes; the flag marks post-order nodes whose children were pushed
    pending: VecDeque<(NodeId, bool)>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    pub fn new(tree: &'a T, start: NodeId, order: TraversalOrder) -> Self {
        let mut pending = VecDeque::new();
        if tree.get(start).is_some() {
            pending.push_back((start, false));
        }
        Self {
            tree,
            order,
            pending,
        }
    }

    fn next_preorder(&mut self) -> Option<NodeId> {
        let (current, _) = self.pending.pop_back()?;
        for &child in self.tree.children(current).iter().rev() {
            self.pending.push_back((child, false));
        }
        Some(current)
    }

    fn next_postorder(&mut self) -> Option<NodeId> {
        while let Some((current, expanded)) = self.pending.pop_back() {
            if expanded {
                return Some(current);
            }
            self.pending.push_back((current, true));
            for &child in self.tree.children(current).iter().rev() {
                self.pending.push_back((child, false));
            }
        }
        None
    }

    fn next_breadthfirst(&mut self) -> Option<NodeId> {
        let (current, _) = self.pending.pop_front()?;
        for &child in self.tree.children(current) {
            self.pending.push_back((child, false));
        }
        Some(current)
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => self.next_preorder(),
            TraversalOrder::PostOrder => self.next_postorder(),
            TraversalOrder::BreadthFirst => self.next_breadthfirst(),
        }
    }
}
