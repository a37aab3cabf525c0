/*!
 * Core types and data structures for ctxmerge
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MergeError, Result};
use crate::report::FileReportInfo;

/// The paths a user designated as input to one merge
///
/// Mirrors an editor selection context: the item under focus plus an
/// optional multi-select list.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// The single focused item, if any
    pub focused: Option<PathBuf>,
    /// Multi-select list; wins over `focused` when non-empty
    pub selected: Vec<PathBuf>,
}

impl Selection {
    /// Create a selection from a multi-select list only
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            focused: None,
            selected: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve the paths to merge
    pub fn targets(&self) -> Result<Vec<&Path>> {
        if !self.selected.is_empty() {
            return Ok(self.selected.iter().map(PathBuf::as_path).collect());
        }

        match &self.focused {
            Some(path) => Ok(vec![path.as_path()]),
            None => Err(MergeError::EmptySelection),
        }
    }
}

/// A file taking part in the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path
    pub path: PathBuf,
    /// Text content, filled in once the file is read
    pub content: Option<String>,
}

impl FileRecord {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            content: None,
        }
    }

    /// Case-insensitive identity of the file
    pub fn key(&self) -> String {
        canonical_key(&self.path)
    }
}

/// Lower-cased absolute path string used to deduplicate files
pub fn canonical_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Insertion-ordered set of files keyed by canonical path
///
/// Re-inserting a key replaces the stored record in place, so the first
/// discovery decides the position and the last one decides the value.
#[derive(Debug, Default)]
pub struct FileSet {
    index: HashMap<String, usize>,
    records: Vec<FileRecord>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning `true` if its key was not present yet
    pub fn insert(&mut self, record: FileRecord) -> bool {
        let key = record.key();
        match self.index.get(&key) {
            Some(&slot) => {
                self.records[slot] = record;
                false
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(&canonical_key(path))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }
}

/// Result of a merge: the rendered document and its statistics
#[derive(Debug, Clone)]
pub struct MergedOutput {
    /// Rendered Markdown with trailing whitespace trimmed
    pub document: String,
    /// Number of files merged
    pub total_files: usize,
    /// Characters in the rendered output before the final trim
    pub total_chars: usize,
    /// `ceil(total_chars / 4)`
    pub estimated_tokens: usize,
    /// Per-file details in merge order
    pub files: Vec<FileReportInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_select_wins_over_focus() {
        let selection = Selection {
            focused: Some(PathBuf::from("/focused.txt")),
            selected: vec![PathBuf::from("/a.txt"), PathBuf::from("/b")],
        };

        let targets = selection.targets().unwrap();
        assert_eq!(targets, vec![Path::new("/a.txt"), Path::new("/b")]);
    }

    #[test]
    fn test_focus_used_without_multi_select() {
        let selection = Selection {
            focused: Some(PathBuf::from("/focused.txt")),
            selected: vec![],
        };

        assert_eq!(selection.targets().unwrap(), vec![Path::new("/focused.txt")]);
    }

    #[test]
    fn test_empty_selection() {
        let err = Selection::default().targets().unwrap_err();
        assert!(matches!(err, MergeError::EmptySelection));
    }

    #[test]
    fn test_file_set_is_case_insensitive() {
        let mut set = FileSet::new();
        assert!(set.insert(FileRecord::new(PathBuf::from("/Project/README.md"))));
        assert!(!set.insert(FileRecord::new(PathBuf::from("/project/readme.md"))));

        assert_eq!(set.len(), 1);
        assert!(set.contains(Path::new("/PROJECT/Readme.MD")));
    }

    #[test]
    fn test_file_set_keeps_first_position_last_value() {
        let mut set = FileSet::new();
        set.insert(FileRecord::new(PathBuf::from("/a/One.txt")));
        set.insert(FileRecord::new(PathBuf::from("/a/two.txt")));
        set.insert(FileRecord::new(PathBuf::from("/a/one.txt")));

        let paths: Vec<_> = set.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/a/one.txt"), PathBuf::from("/a/two.txt")]
        );
    }
}
