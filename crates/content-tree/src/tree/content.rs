//! The content tree arena and its propagation rules
//!
//! Folders derive three fields from their children: priority, size and
//! completed bytes. Changes travel through explicit, synchronous calls:
//!
//! - a priority set on a folder is pushed down to every descendant;
//! - any change on a node asks its parent to re-derive, one level at a time,
//!   and each climb stops as soon as a recomputed aggregate is unchanged.
//!
//! The root is an invisible header container. None of its fields are
//! derived and every `update_*` call on it is a no-op.

use crate::tree::{
    Column, Node, NodeId, NodeKind, Priority, TraversalOrder, Tree, TreeOptions, TreeTraversal,
};
use anyhow::{ensure, Result};
use log::{debug, trace};

/// Counters for how often each upward recomputation actually ran
///
/// Only steps on non-root folders that passed their no-op checks count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    pub priority_updates: usize,
    pub size_updates: usize,
    pub progress_updates: usize,
}

/// A torrent's files and folders with derived folder aggregates
#[derive(Debug, Clone)]
pub struct ContentTree {
    /// Arena storage; index 0 is the root
    nodes: Vec<Node>,
    /// File nodes by file index
    files: Vec<NodeId>,
    /// Root column labels
    pub(crate) header: [String; Column::COUNT],
    options: TreeOptions,
    stats: PropagationStats,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// Create an empty tree with default options and header labels
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self::with_header(Column::ALL.map(|c| c.to_string()), options)
    }

    /// Create an empty tree whose root carries the given column labels
    ///
    /// The root has no parent and none of its fields are aggregated.
    pub fn with_header(header: [String; Column::COUNT], options: TreeOptions) -> Self {
        let root = Node::folder(header[Column::Name.index()].clone(), None, Priority::NORMAL);
        Self {
            nodes: vec![root],
            files: Vec::new(),
            header,
            options,
            stats: PropagationStats::default(),
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn stats(&self) -> PropagationStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = PropagationStats::default();
    }

    fn node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.get()) {
            Some(node) => node,
            None => panic!("{id} does not exist in this tree"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.get()) {
            Some(node) => node,
            None => panic!("{id} does not exist in this tree"),
        }
    }

    fn assert_folder(&self, id: NodeId) {
        let node = self.node(id);
        assert!(
            node.is_folder(),
            "{id} ({}) is a file, expected a folder",
            node.name
        );
    }

    fn push_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.node_mut(parent).children.push(id);
        id
    }

    /// Append a new folder as the last child of `parent`
    ///
    /// The incomplete suffix is stripped from the display name. The folder
    /// starts empty; its aggregates settle once children are added and
    /// [`refresh_aggregates`](Self::refresh_aggregates) runs, or as leaves
    /// change.
    ///
    /// # Panics
    ///
    /// If `parent` is not a folder of this tree.
    pub fn add_folder(&mut self, name: &str, parent: NodeId) -> NodeId {
        self.assert_folder(parent);
        let name = self.options.display_name(name).to_string();
        let priority = self.options.default_priority;
        self.push_child(parent, Node::folder(name, Some(parent), priority))
    }

    /// Append a new file as the last child of `parent`
    ///
    /// The file gets the next file index and the default priority, with
    /// nothing downloaded yet.
    ///
    /// # Panics
    ///
    /// If `parent` is not a folder of this tree, or the default priority is
    /// `PARTIAL`.
    pub fn add_file(&mut self, name: &str, size: u64, parent: NodeId) -> NodeId {
        self.assert_folder(parent);
        let priority = self.options.default_priority;
        assert!(!priority.is_partial(), "files cannot default to {priority}");

        let name = self.options.display_name(name).to_string();
        let file_index = self.files.len();
        let id = self.push_child(parent, Node::file(name, size, parent, file_index, priority));
        self.files.push(id);
        id
    }

    /// Release every node below the root
    ///
    /// All previously handed out IDs except [`NodeId::ROOT`] become invalid.
    ///
    /// # Panics
    ///
    /// If `folder` is not the root.
    pub fn clear_children(&mut self, folder: NodeId) {
        assert!(self.is_root(folder), "only the root can clear its children, got {folder}");
        debug!("Clearing content tree ({} nodes)", self.nodes.len() - 1);
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
        self.files.clear();
    }

    /// First direct child folder named `name`, comparing display names
    pub fn child_folder_with_name(&self, folder: NodeId, name: &str) -> Option<NodeId> {
        self.children(folder)
            .iter()
            .copied()
            .find(|&id| self.node(id).is_folder() && self.node(id).name == name)
    }

    /// Set a node's priority and restore every invariant before returning
    ///
    /// Equivalent to [`set_priority_with`](Self::set_priority_with) with
    /// `propagate_to_parent = true`.
    pub fn set_priority(&mut self, id: NodeId, priority: Priority) {
        self.set_priority_with(id, priority, true);
    }

    /// Set a node's priority
    ///
    /// For a folder, a concrete priority is forced onto every descendant
    /// without letting them climb back up. `propagate_to_parent` asks the
    /// parent to re-derive its own priority.
    ///
    /// Setting the root only pushes the priority down; it is never a no-op
    /// since the root's stored priority is not derived.
    ///
    /// # Panics
    ///
    /// If `priority` is `PARTIAL` and `id` is a file.
    pub fn set_priority_with(&mut self, id: NodeId, priority: Priority, propagate_to_parent: bool) {
        match self.node(id).kind {
            NodeKind::File => self.set_file_priority(id, priority, propagate_to_parent),
            NodeKind::Folder => self.set_folder_priority(id, priority, propagate_to_parent),
        }
    }

    fn set_file_priority(&mut self, id: NodeId, priority: Priority, propagate_to_parent: bool) {
        let node = self.node_mut(id);
        assert!(
            !priority.is_partial(),
            "file {} cannot have a {priority} priority",
            node.name
        );
        if node.priority == priority {
            return;
        }
        trace!("{}: priority {} -> {}", node.name, node.priority, priority);
        node.priority = priority;
        let parent = node.parent;

        if propagate_to_parent {
            if let Some(parent) = parent {
                self.update_size(parent);
                self.update_progress(parent);
                self.update_priority(parent);
            }
        }
    }

    fn set_folder_priority(&mut self, id: NodeId, priority: Priority, propagate_to_parent: bool) {
        let is_root = self.is_root(id);
        let node = self.node_mut(id);
        if node.priority == priority && !is_root {
            return;
        }
        trace!("{}: priority {} -> {}", node.name, node.priority, priority);
        let was_ignored = node.priority.is_ignored();
        node.priority = priority;
        let parent = node.parent;

        if propagate_to_parent {
            if let Some(parent) = parent {
                self.update_priority(parent);
            }
        }

        if !priority.is_partial() {
            for row in 0..self.node(id).children.len() {
                let child = self.node(id).children[row];
                self.set_priority_with(child, priority, false);
            }
        }

        self.update_size(id);
        self.update_progress(id);

        // Joining or leaving the parent's sums does not change this folder's
        // own aggregates, so the climbs above may have stopped here
        if propagate_to_parent && was_ignored != priority.is_ignored() {
            if let Some(parent) = parent {
                self.update_size(parent);
                self.update_progress(parent);
            }
        }
    }

    /// Re-derive a folder's priority from its direct children
    ///
    /// Uniform children give their shared priority, anything else gives
    /// `PARTIAL`. No-op for the root and for empty folders.
    pub fn update_priority(&mut self, folder: NodeId) {
        self.assert_folder(folder);
        if self.is_root(folder) {
            return;
        }
        let Some(derived) = self.unified_priority(folder) else {
            return;
        };
        self.stats.priority_updates += 1;

        // set_priority is a no-op when nothing changed
        self.set_priority_with(folder, derived, true);
    }

    /// Re-derive a folder's size from its non-ignored children
    ///
    /// Climbs to the parent only when the size actually changed.
    pub fn update_size(&mut self, folder: NodeId) {
        self.assert_folder(folder);
        if self.is_root(folder) {
            return;
        }
        self.stats.size_updates += 1;

        let size = self.aggregate_size(folder);
        let node = self.node_mut(folder);
        if size == node.size {
            return;
        }
        trace!("{}: size {} -> {}", node.name, node.size, size);
        node.size = size;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.update_size(parent);
        }
    }

    /// Re-derive a folder's completed bytes from its non-ignored children
    ///
    /// Climbs to the parent only when the value actually changed.
    ///
    /// # Panics
    ///
    /// If the recomputed value exceeds the folder's size, which means the
    /// file data fed into the tree is inconsistent.
    pub fn update_progress(&mut self, folder: NodeId) {
        self.assert_folder(folder);
        if self.is_root(folder) {
            return;
        }
        self.stats.progress_updates += 1;

        let total_done = self.aggregate_done(folder);
        let node = self.node_mut(folder);
        assert!(
            total_done <= node.size,
            "{}: completed bytes {} exceed size {}",
            node.name,
            total_done,
            node.size
        );
        if total_done == node.total_done {
            return;
        }
        trace!("{}: done {} -> {}", node.name, node.total_done, total_done);
        node.total_done = total_done;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.update_progress(parent);
        }
    }

    /// Shared priority of the direct children, `PARTIAL` if they differ,
    /// `None` for an empty folder
    fn unified_priority(&self, folder: NodeId) -> Option<Priority> {
        let (&first, rest) = self.node(folder).children.split_first()?;
        let shared = self.node(first).priority;
        if rest.iter().all(|&child| self.node(child).priority == shared) {
            Some(shared)
        } else {
            Some(Priority::PARTIAL)
        }
    }

    fn counted_children(&self, folder: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.node(folder)
            .children
            .iter()
            .map(move |&child| self.node(child))
            .filter(|child| !child.priority.is_ignored())
    }

    fn aggregate_size(&self, folder: NodeId) -> u64 {
        self.counted_children(folder).map(|child| child.size).sum()
    }

    fn aggregate_done(&self, folder: NodeId) -> u64 {
        self.counted_children(folder).map(|child| child.total_done).sum()
    }

    /// Record `bytes` as completed for a file and update its ancestors
    pub fn set_total_done(&mut self, file: NodeId, bytes: u64) -> Result<()> {
        let node = self.node_mut(file);
        ensure!(node.is_file(), "{} is a folder, expected a file", node.name);
        ensure!(
            bytes <= node.size,
            "{}: completed bytes {} exceed size {}",
            node.name,
            bytes,
            node.size
        );
        node.total_done = bytes;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.update_progress(parent);
        }
        Ok(())
    }

    /// Overwrite a file's completed bytes without touching its ancestors
    pub(crate) fn set_file_done(&mut self, file: NodeId, bytes: u64) {
        let node = self.node_mut(file);
        debug_assert!(node.is_file() && bytes <= node.size);
        node.total_done = bytes;
    }

    /// Record a completed fraction for a file, clamped to `0.0..=1.0`
    pub fn set_progress(&mut self, file: NodeId, fraction: f64) -> Result<()> {
        let size = self.node(file).size;
        let bytes = (fraction.clamp(0.0, 1.0) * size as f64).round() as u64;
        self.set_total_done(file, bytes.min(size))
    }

    /// Re-derive every folder in one bottom-up pass, without propagation
    ///
    /// Used after building the tree or after bulk leaf updates, where
    /// climbing once per leaf would be wasted work.
    pub fn refresh_aggregates(&mut self) {
        let order: Vec<NodeId> = self
            .walk(TraversalOrder::PostOrder)
            .filter(|&id| !self.is_root(id) && self.node(id).is_folder())
            .collect();

        for folder in order {
            let priority = self
                .unified_priority(folder)
                .unwrap_or(self.node(folder).priority);

            // Sizes and progress depend on the folder's children only, whose
            // priorities are already final in post-order.
            let size = self.aggregate_size(folder);
            let total_done = self.aggregate_done(folder);
            debug_assert!(total_done <= size);

            let node = self.node_mut(folder);
            node.priority = priority;
            node.size = size;
            node.total_done = total_done;
        }
    }

    /// File node for a file index, `None` when out of range
    pub fn file(&self, file_index: usize) -> Option<NodeId> {
        self.files.get(file_index).copied()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub(crate) fn file_ids(&self) -> &[NodeId] {
        &self.files
    }

    /// Sum of the sizes of the root's non-ignored children
    pub fn selected_size(&self) -> u64 {
        self.aggregate_size(self.root())
    }

    /// Sum of the completed bytes of the root's non-ignored children
    pub fn selected_done(&self) -> u64 {
        self.aggregate_done(self.root())
    }
}

impl Tree for ContentTree {
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.get())
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.get())?.parent
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.get())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
