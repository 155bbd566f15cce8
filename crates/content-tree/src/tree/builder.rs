//! Building a content tree from a torrent's file list

use crate::tree::{ContentTree, NodeId, Priority, Tree, TreeOptions};
use anyhow::{bail, Context, Result};
use log::debug;
use smallvec::SmallVec;

/// Split a torrent-relative path into its segments
///
/// Both `/` and `\` separate segments. Empty paths and empty segments
/// (`a//b`, a leading or trailing separator) are rejected.
fn split_path(path: &str) -> Result<SmallVec<[&str; 8]>> {
    if path.is_empty() {
        bail!("empty file path");
    }
    let segments: SmallVec<[&str; 8]> = path.split(['/', '\\']).collect();
    if segments.iter().any(|s| s.is_empty()) {
        bail!("file path {path:?} has an empty segment");
    }
    Ok(segments)
}

impl ContentTree {
    /// Build a tree from `(path, size)` pairs, in file-index order
    ///
    /// Folders are created once per distinct path segment under the same
    /// parent, in order of first appearance. Every file gets the configured
    /// default priority, then all folder aggregates are derived in a single
    /// bottom-up pass.
    ///
    /// ```
    /// use content_tree::prelude::*;
    ///
    /// let tree = ContentTree::from_files(
    ///     [("album/01.flac", 30), ("album/02.flac", 20)],
    ///     TreeOptions::default(),
    /// )
    /// .unwrap();
    ///
    /// let album = tree.find_by_path("album").unwrap();
    /// assert_eq!(tree.get(album).unwrap().size(), 50);
    /// ```
    pub fn from_files<I, P>(entries: I, options: TreeOptions) -> Result<Self>
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<str>,
    {
        options.validate()?;
        let mut tree = ContentTree::with_options(options);
        for (path, size) in entries {
            let path = path.as_ref();
            tree.insert_path(path, size)
                .with_context(|| format!("Failed to add {path:?} to the content tree"))?;
        }
        tree.refresh_aggregates();

        debug!(
            "Built content tree: {} files, {} nodes",
            tree.file_count(),
            tree.node_count()
        );
        Ok(tree)
    }

    /// Build a tree, then apply one priority per file
    pub fn from_files_with_priorities<I, P>(
        entries: I,
        priorities: &[Priority],
        options: TreeOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<str>,
    {
        let mut tree = Self::from_files(entries, options)?;
        tree.set_files_priority(priorities)?;
        Ok(tree)
    }

    fn insert_path(&mut self, path: &str, size: u64) -> Result<NodeId> {
        let segments = split_path(path)?;
        let (file_name, folders) = match segments.split_last() {
            Some(split) => split,
            None => bail!("empty file path"),
        };

        let mut parent = self.root();
        for segment in folders {
            let name = self.options().display_name(segment);
            parent = match self.child_folder_with_name(parent, name) {
                Some(folder) => folder,
                None => {
                    if self.child_named(parent, name).is_some() {
                        bail!("folder {name:?} collides with a file of the same name");
                    }
                    self.add_folder(segment, parent)
                }
            };
        }

        let name = self.options().display_name(file_name);
        if self.child_named(parent, name).is_some() {
            bail!("{name:?} already exists in this folder");
        }
        Ok(self.add_file(file_name, size, parent))
    }

    fn child_named(&self, folder: NodeId, name: &str) -> Option<NodeId> {
        self.children(folder)
            .iter()
            .copied()
            .find(|&id| self.name(id) == Some(name))
    }
}
