//! Column view of the tree for a display layer
//!
//! A display layer reads rows through [`ContentTree::data`] or
//! [`ContentTree::row`], calls `set_priority` on user interaction and
//! re-reads the affected rows once the call returns.

use crate::tree::{ContentTree, NodeId, Priority, TraversalOrder, Tree, TreeTraversal};
use derive_more::Display;
use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Progress shown for nodes with nothing to download
pub const NO_PROGRESS: f64 = -1.0;

/// Columns exposed for every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Column {
    #[display(fmt = "Name")]
    Name,
    #[display(fmt = "Size")]
    Size,
    #[display(fmt = "Progress")]
    Progress,
    #[display(fmt = "Priority")]
    Priority,
    #[display(fmt = "Remaining")]
    Remaining,
}

impl Column {
    pub const COUNT: usize = 5;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Name,
        Column::Size,
        Column::Progress,
        Column::Priority,
        Column::Remaining,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// The value of one cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellValue {
    /// Names, and every header cell of the root
    Text(String),
    /// Sizes and remaining bytes
    Bytes(u64),
    /// Completed fraction, or [`NO_PROGRESS`] for empty nodes
    Progress(f64),
    Priority(Priority),
}

/// Snapshot of every column of a non-root node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    pub name: String,
    pub size: u64,
    pub progress: f64,
    pub priority: Priority,
    pub remaining: u64,
}

impl ContentTree {
    /// Label of a column, as carried by the root
    pub fn header(&self, column: Column) -> &str {
        &self.header[column.index()]
    }

    /// Value of one cell, `None` for an unknown node
    pub fn data(&self, id: NodeId, column: Column) -> Option<CellValue> {
        if self.is_root(id) {
            return Some(CellValue::Text(self.header(column).to_string()));
        }
        let node = self.get(id)?;
        let value = match column {
            Column::Name => CellValue::Text(node.name().to_string()),
            Column::Size => CellValue::Bytes(node.size()),
            Column::Progress if node.size() == 0 => CellValue::Progress(NO_PROGRESS),
            Column::Progress => CellValue::Progress(node.progress()),
            Column::Priority => CellValue::Priority(node.priority()),
            Column::Remaining => CellValue::Bytes(node.remaining()),
        };
        Some(value)
    }

    /// All columns of a node, `None` for the root and unknown nodes
    pub fn row(&self, id: NodeId) -> Option<Row> {
        if self.is_root(id) {
            return None;
        }
        let node = self.get(id)?;
        Some(Row {
            name: node.name().to_string(),
            size: node.size(),
            progress: if node.size() == 0 {
                NO_PROGRESS
            } else {
                node.progress()
            },
            priority: node.priority(),
            remaining: node.remaining(),
        })
    }

    /// Indented text listing of the tree, one node per line
    ///
    /// Folders end with `/`; each line shows priority and completed bytes.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for id in self.walk(TraversalOrder::PreOrder) {
            if self.is_root(id) {
                continue;
            }
            let Some(node) = self.get(id) else {
                continue;
            };
            let indent = "  ".repeat(self.depth(id) - 1);
            let slash = if node.is_folder() { "/" } else { "" };
            // Writing into a String cannot fail
            let _ = writeln!(
                out,
                "{indent}{}{slash} [{}] {}/{}",
                node.name(),
                node.priority(),
                node.total_done(),
                node.size()
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeOptions;
    use pretty_assertions::assert_eq;

    fn tree() -> ContentTree {
        ContentTree::from_files(
            [("docs/readme.txt", 40), ("docs/empty.txt", 0)],
            TreeOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_column_index() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
            assert_eq!(Column::from_index(i), Some(*column));
        }
        assert_eq!(Column::from_index(Column::COUNT), None);
    }

    #[test]
    fn test_root_shows_header() {
        let tree = tree();
        assert_eq!(
            tree.data(tree.root(), Column::Progress),
            Some(CellValue::Text("Progress".to_string()))
        );
        assert!(tree.row(tree.root()).is_none());
    }

    #[test]
    fn test_custom_header() {
        let header = ["Nom", "Taille", "Progression", "Priorité", "Restant"].map(String::from);
        let tree = ContentTree::with_header(header, TreeOptions::default());
        assert_eq!(tree.header(Column::Size), "Taille");
        assert_eq!(tree.name(tree.root()), Some("Nom"));
    }

    #[test]
    fn test_cells() {
        let mut tree = tree();
        let readme = tree.find_by_path("docs/readme.txt").unwrap();
        let empty = tree.find_by_path("docs/empty.txt").unwrap();
        tree.set_total_done(readme, 10).unwrap();

        assert_eq!(tree.data(readme, Column::Progress), Some(CellValue::Progress(0.25)));
        assert_eq!(tree.data(readme, Column::Remaining), Some(CellValue::Bytes(30)));
        assert_eq!(tree.data(empty, Column::Progress), Some(CellValue::Progress(NO_PROGRESS)));
        assert_eq!(tree.data(NodeId(99), Column::Name), None);

        assert_eq!(
            tree.row(readme),
            Some(Row {
                name: "readme.txt".to_string(),
                size: 40,
                progress: 0.25,
                priority: Priority::NORMAL,
                remaining: 30,
            })
        );
    }

    #[test]
    fn test_render() {
        let mut tree = tree();
        let empty = tree.find_by_path("docs/empty.txt").unwrap();
        tree.set_priority(empty, Priority::IGNORED);

        insta::assert_snapshot!(tree.render(), @r"
        docs/ [Mixed] 0/40
          readme.txt [Normal] 0/40
          empty.txt [Ignored] 0/0
        ");
    }
}
