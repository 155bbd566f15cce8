//! Operations addressed by file index, as the download engine reports them

use crate::tree::{ContentTree, Priority, Tree};
use anyhow::{bail, ensure, Result};
use log::debug;

impl ContentTree {
    /// Priority of every file, by file index
    pub fn files_priority(&self) -> Vec<Priority> {
        self.file_ids()
            .iter()
            .filter_map(|&id| self.get(id))
            .map(|node| node.priority())
            .collect()
    }

    /// Apply one priority per file, then re-derive every folder once
    ///
    /// Fails without touching the tree when the lengths differ or a
    /// priority is `PARTIAL`.
    pub fn set_files_priority(&mut self, priorities: &[Priority]) -> Result<()> {
        ensure!(
            priorities.len() == self.file_count(),
            "got {} priorities for {} files",
            priorities.len(),
            self.file_count()
        );
        if let Some(index) = priorities.iter().position(|p| p.is_partial()) {
            bail!("file {index} cannot have a {} priority", Priority::PARTIAL);
        }

        debug!("Applying priorities to {} files", priorities.len());
        let files = self.file_ids().to_vec();
        for (id, &priority) in files.into_iter().zip(priorities) {
            self.set_priority_with(id, priority, false);
        }
        self.refresh_aggregates();
        Ok(())
    }

    /// Apply the engine's completed byte count for every file
    ///
    /// Fails without touching the tree when the lengths differ or a count
    /// exceeds its file's size.
    pub fn update_files_progress(&mut self, completed: &[u64]) -> Result<()> {
        ensure!(
            completed.len() == self.file_count(),
            "got {} progress values for {} files",
            completed.len(),
            self.file_count()
        );
        for (index, (&id, &bytes)) in self.file_ids().iter().zip(completed).enumerate() {
            let size = self.get(id).map(|node| node.size()).unwrap_or(0);
            ensure!(
                bytes <= size,
                "file {index}: completed bytes {bytes} exceed size {size}"
            );
        }

        let files = self.file_ids().to_vec();
        for (id, &bytes) in files.into_iter().zip(completed) {
            self.set_file_done(id, bytes);
        }
        self.refresh_aggregates();
        Ok(())
    }

    /// True when no file is selected for download
    pub fn all_filtered(&self) -> bool {
        self.files_priority().iter().all(|p| p.is_ignored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TreeOptions, TreeTraversal};
    use pretty_assertions::assert_eq;

    fn tree() -> ContentTree {
        ContentTree::from_files(
            [("set/a", 10), ("set/inner/b", 20), ("set/inner/c", 30)],
            TreeOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_files_priority_roundtrip() {
        let mut tree = tree();
        let wanted = vec![Priority::HIGH, Priority::IGNORED, Priority::IGNORED];
        tree.set_files_priority(&wanted).unwrap();

        assert_eq!(tree.files_priority(), wanted);
        let inner = tree.find_by_path("set/inner").unwrap();
        let set = tree.find_by_path("set").unwrap();
        assert_eq!(tree.get(inner).unwrap().priority(), Priority::IGNORED);
        assert_eq!(tree.get(inner).unwrap().size(), 0);
        assert_eq!(tree.get(set).unwrap().priority(), Priority::PARTIAL);
        assert_eq!(tree.get(set).unwrap().size(), 10);
        assert!(!tree.all_filtered());

        tree.set_files_priority(&[Priority::IGNORED; 3]).unwrap();
        assert!(tree.all_filtered());
        assert_eq!(tree.selected_size(), 0);
    }

    #[test]
    fn test_set_files_priority_validates() {
        let mut tree = tree();
        assert!(tree.set_files_priority(&[Priority::HIGH]).is_err());
        assert!(tree
            .set_files_priority(&[Priority::HIGH, Priority::PARTIAL, Priority::HIGH])
            .is_err());
        assert_eq!(tree.files_priority(), vec![Priority::NORMAL; 3]);
    }

    #[test]
    fn test_update_files_progress() {
        let mut tree = tree();
        tree.update_files_progress(&[10, 5, 15]).unwrap();

        let inner = tree.find_by_path("set/inner").unwrap();
        assert_eq!(tree.get(inner).unwrap().total_done(), 20);
        assert_eq!(tree.selected_done(), 30);

        assert!(tree.update_files_progress(&[10, 5]).is_err());
        assert!(tree.update_files_progress(&[11, 0, 0]).is_err());
        assert_eq!(tree.selected_done(), 30);
    }
}
