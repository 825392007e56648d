//! Descendant enumeration for recursive actions.

use super::selection::{EntryKind, SelectedEntry};
use tracing::warn;
use walkdir::WalkDir;

/// Enumerates an entry and everything below it.
///
/// Implementations yield `root` first, followed by its descendants in a
/// deterministic depth-first order.
pub trait DirectoryWalker: Send + Sync {
    fn walk(&self, root: &SelectedEntry) -> Vec<SelectedEntry>;
}

/// Walks the real filesystem with `walkdir`, sorted by file name, without
/// following symlinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWalker;

impl DirectoryWalker for FsWalker {
    fn walk(&self, root: &SelectedEntry) -> Vec<SelectedEntry> {
        let mut entries = vec![root.clone()];
        if root.kind() != EntryKind::Directory {
            return entries;
        }

        let walker = WalkDir::new(root.path())
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for item in walker {
            match item {
                Ok(item) => {
                    let entry = if item.file_type().is_dir() {
                        SelectedEntry::directory(item.into_path())
                    } else {
                        SelectedEntry::file(item.into_path())
                    };
                    entries.push(entry);
                }
                Err(e) => {
                    warn!("Skipping unreadable entry below {}: {}", root.path().display(), e);
                }
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_walk_directory_sorted_depth_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/x.o"), "").unwrap();
        fs::write(root.join("b/inner/core"), "").unwrap();
        fs::write(root.join("c.bak"), "").unwrap();

        let walked = FsWalker.walk(&SelectedEntry::directory(root));
        let relative: Vec<(PathBuf, EntryKind)> = walked
            .iter()
            .map(|e| (e.path().strip_prefix(root).unwrap().to_path_buf(), e.kind()))
            .collect();

        assert_eq!(
            relative,
            vec![
                (PathBuf::from(""), EntryKind::Directory),
                (PathBuf::from("a"), EntryKind::Directory),
                (PathBuf::from("a/x.o"), EntryKind::File),
                (PathBuf::from("b"), EntryKind::Directory),
                (PathBuf::from("b/inner"), EntryKind::Directory),
                (PathBuf::from("b/inner/core"), EntryKind::File),
                (PathBuf::from("c.bak"), EntryKind::File),
            ]
        );
    }

    #[test]
    fn test_dot_entry_and_file_are_leaves() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let dot = SelectedEntry::dot_entry(tmp.path());
        assert_eq!(FsWalker.walk(&dot), vec![dot.clone()]);

        let file = SelectedEntry::file(tmp.path().join("f"));
        assert_eq!(FsWalker.walk(&file), vec![file.clone()]);
    }
}
