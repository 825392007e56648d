//! Selection context: the entries a cleanup action is invoked on.

use crate::error::{CleanupError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// What kind of tree node a selected entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    /// The non-directory children of a directory, viewed as one unit.
    DotEntry,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::DotEntry => write!(f, "dot entry"),
        }
    }
}

/// One selected node of the directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEntry {
    path: PathBuf,
    display_name: String,
    kind: EntryKind,
}

impl SelectedEntry {
    pub fn new(path: impl Into<PathBuf>, display_name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            kind,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self::new(path, name, EntryKind::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self::new(path, name, EntryKind::Directory)
    }

    /// The dot entry of `dir`. It shares the directory's path.
    pub fn dot_entry(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, "<Files>", EntryKind::DotEntry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Base name of the entry's path; for a dot entry that is its directory's name.
    pub fn name(&self) -> String {
        base_name(&self.path)
    }

    /// The directory this entry lives in or stands for.
    ///
    /// Directories and dot entries are their own directory; a file's is its parent.
    pub fn directory_path(&self) -> &Path {
        match self.kind {
            EntryKind::Directory | EntryKind::DotEntry => &self.path,
            EntryKind::File => self.parent_path(),
        }
    }

    /// Parent directory of the tree node itself.
    ///
    /// The parent of a dot entry is the directory it belongs to.
    pub fn parent_path(&self) -> &Path {
        match self.kind {
            EntryKind::DotEntry => &self.path,
            EntryKind::File | EntryKind::Directory => {
                self.path.parent().unwrap_or(self.path.as_path())
            }
        }
    }

    /// Label used in confirmation prompts.
    pub fn describe(&self) -> String {
        match self.kind {
            EntryKind::DotEntry => format!("{} in {}", self.display_name, self.path.display()),
            _ => self.path.display().to_string(),
        }
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Ordered, non-empty set of selected entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<SelectedEntry>,
}

impl Selection {
    pub fn new(entries: Vec<SelectedEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(CleanupError::EmptySelection);
        }
        Ok(Self { entries })
    }

    pub fn single(entry: SelectedEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    pub fn entries(&self) -> &[SelectedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a selection from real filesystem paths, the way a front end
    /// without a directory model would.
    ///
    /// With `dot_entries`, directory arguments become their dot entry.
    pub fn from_paths<I, P>(paths: I, dot_entries: bool) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        use anyhow::Context;

        let mut entries = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let absolute = std::path::absolute(path)
                .with_context(|| format!("Cannot resolve {}", path.display()))?;
            let metadata = std::fs::symlink_metadata(&absolute)
                .with_context(|| format!("Cannot stat {}", absolute.display()))?;
            let entry = if metadata.is_dir() {
                if dot_entries {
                    SelectedEntry::dot_entry(absolute)
                } else {
                    SelectedEntry::directory(absolute)
                }
            } else {
                SelectedEntry::file(absolute)
            };
            entries.push(entry);
        }
        Ok(Self::new(entries)?)
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a SelectedEntry;
    type IntoIter = std::slice::Iter<'a, SelectedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_rejected() {
        assert_eq!(Selection::new(vec![]), Err(CleanupError::EmptySelection));
    }

    #[test]
    fn test_dot_entry_shares_directory_path() {
        let dot = SelectedEntry::dot_entry("/home/user/src");
        assert_eq!(dot.path(), Path::new("/home/user/src"));
        assert_eq!(dot.kind(), EntryKind::DotEntry);
        assert_eq!(dot.name(), "src");
        assert_eq!(dot.directory_path(), Path::new("/home/user/src"));
        assert_eq!(dot.parent_path(), Path::new("/home/user/src"));
        assert_eq!(dot.describe(), "<Files> in /home/user/src");
    }

    #[test]
    fn test_file_paths() {
        let file = SelectedEntry::file("/var/log/syslog.1");
        assert_eq!(file.display_name(), "syslog.1");
        assert_eq!(file.directory_path(), Path::new("/var/log"));
        assert_eq!(file.parent_path(), Path::new("/var/log"));
    }

    #[test]
    fn test_directory_paths() {
        let dir = SelectedEntry::directory("/var/cache/apt");
        assert_eq!(dir.directory_path(), Path::new("/var/cache/apt"));
        assert_eq!(dir.parent_path(), Path::new("/var/cache"));
    }

    #[test]
    fn test_from_paths_classifies_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let selection = Selection::from_paths([tmp.path(), file.as_path()], false).unwrap();
        let kinds: Vec<_> = selection.iter().map(SelectedEntry::kind).collect();
        assert_eq!(kinds, vec![EntryKind::Directory, EntryKind::File]);

        let selection = Selection::from_paths([tmp.path()], true).unwrap();
        assert_eq!(selection.entries()[0].kind(), EntryKind::DotEntry);
    }

    #[test]
    fn test_from_paths_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Selection::from_paths([tmp.path().join("missing")], false).is_err());
    }
}
