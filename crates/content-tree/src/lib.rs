//! Content Tree
//!
//! Tracks the files of a torrent organized into nested folders. Every folder
//! derives a download priority, a total size and a completed byte count from
//! its children, and keeps them consistent as single files change.
//!
//! # Core Concepts
//!
//! - **File**: a leaf whose size and progress come from the torrent and the
//!   download engine
//! - **Folder**: an internal node whose fields are derived from its children
//! - **Priority**: `IGNORED` files are excluded from folder sums; a folder
//!   whose children disagree shows `PARTIAL`
//!
//! # Example
//!
//! ```
//! use content_tree::prelude::*;
//!
//! let mut tree = ContentTree::from_files(
//!     [("show/e01.mkv", 100), ("show/e02.mkv", 100)],
//!     TreeOptions::default(),
//! )?;
//!
//! let show = tree.find_by_path("show").unwrap();
//! let e01 = tree.find_by_path("show/e01.mkv").unwrap();
//! tree.set_priority(e01, Priority::IGNORED);
//!
//! let folder = tree.get(show).unwrap();
//! assert_eq!(folder.size(), 100);
//! assert_eq!(folder.priority(), Priority::PARTIAL);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::tree::prelude::*;
}
