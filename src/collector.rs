/*!
 * Recursive file collection
 *
 * Walks one directory level at a time and recurses into subdirectories
 * depth-first, so an excluded name is rejected before its subtree is ever
 * listed.
 */

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, ResultExt};
use crate::utils::{absolute_path, is_excluded_name};

/// Predicate deciding whether a directory entry name is skipped
pub type ExclusionFilter = Box<dyn Fn(&OsStr) -> bool>;

/// Collects the files reachable from a starting path
pub struct Collector {
    exclude: ExclusionFilter,
    sort_entries: bool,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Create a collector using the built-in exclusion set and sorted listings
    pub fn new() -> Self {
        Self {
            exclude: Box::new(|name: &OsStr| name.to_str().is_some_and(is_excluded_name)),
            sort_entries: true,
        }
    }

    /// Replace the exclusion predicate
    pub fn with_exclusion<F>(mut self, exclude: F) -> Self
    where
        F: Fn(&OsStr) -> bool + 'static,
    {
        self.exclude = Box::new(exclude);
        self
    }

    /// Sort each directory listing by file name (default) or keep OS order
    pub fn with_sorted_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Collect every file reachable from `path`, in depth-first order
    pub fn collect(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let abs_path = absolute_path(path).with_path(path)?;
        let metadata = fs::metadata(&abs_path).with_path(path)?;

        if metadata.is_file() {
            return Ok(vec![abs_path]);
        }

        let mut files = Vec::new();
        if metadata.is_dir() {
            self.collect_directory(&abs_path, &mut files)?;
        } else {
            debug!(path = %abs_path.display(), "Selection is neither a file nor a directory");
        }

        Ok(files)
    }

    fn collect_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        if self.sort_entries {
            walker = walker.sort_by_file_name();
        }

        for entry in walker {
            let entry = entry?;

            if (self.exclude)(entry.file_name()) {
                trace!(path = %entry.path().display(), "Skipping excluded entry");
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_file() {
                files.push(entry.into_path());
            } else if file_type.is_dir() {
                self.collect_directory(entry.path(), files)?;
            } else {
                trace!(path = %entry.path().display(), "Skipping special entry");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    use tempfile::tempdir;

    use crate::error::MergeError;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(path).unwrap();
        writeln!(file, "content").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_single_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("notes.txt");
        touch(&file);

        let files = Collector::new().collect(&file).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_depth_first_preorder() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("a.txt"));
        touch(&temp.path().join("b/c.txt"));
        touch(&temp.path().join("b/d/e.txt"));
        touch(&temp.path().join("z.txt"));

        let files = Collector::new().collect(temp.path()).unwrap();
        assert_eq!(
            names(temp.path(), &files),
            vec!["a.txt", "b/c.txt", "b/d/e.txt", "z.txt"]
        );
    }

    #[test]
    fn test_excluded_names_at_any_depth() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("keep.txt"));
        touch(&temp.path().join("node_modules/pkg/index.js"));
        touch(&temp.path().join(".git/config"));
        touch(&temp.path().join("src/dist/bundle.js"));
        touch(&temp.path().join("src/deep/er/build/out.o"));
        touch(&temp.path().join("src/lib.rs"));
        touch(&temp.path().join("src/out"));

        let files = Collector::new().collect(temp.path()).unwrap();
        assert_eq!(names(temp.path(), &files), vec!["keep.txt", "src/lib.rs"]);
    }

    #[test]
    fn test_selected_root_is_not_filtered_by_name() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("dist/app.js"));

        let files = Collector::new().collect(&temp.path().join("dist")).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_empty_directory() {
        let temp = tempdir().unwrap();
        let files = Collector::new().collect(temp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_custom_exclusion() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("a.txt"));
        touch(&temp.path().join("b.log"));
        touch(&temp.path().join("node_modules/c.txt"));

        let collector =
            Collector::new().with_exclusion(|name| name.to_string_lossy().ends_with(".log"));
        let files = collector.collect(temp.path()).unwrap();

        assert_eq!(
            names(temp.path(), &files),
            vec!["a.txt", "node_modules/c.txt"]
        );
    }

    #[test]
    fn test_unsorted_collects_same_set() {
        let temp = tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            touch(&temp.path().join(name));
        }

        let mut files = Collector::new()
            .with_sorted_entries(false)
            .collect(temp.path())
            .unwrap();
        files.sort();

        assert_eq!(names(temp.path(), &files), vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_ignored() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("real.txt"));
        std::os::unix::fs::symlink(temp.path().join("real.txt"), temp.path().join("link.txt"))
            .unwrap();

        let files = Collector::new().collect(temp.path()).unwrap();
        assert_eq!(names(temp.path(), &files), vec!["real.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_selected_symlink_keeps_its_path() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("outside/f.txt"));
        fs::create_dir(temp.path().join("ws")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("outside"), temp.path().join("ws/link"))
            .unwrap();

        let files = Collector::new()
            .collect(&temp.path().join("ws/link"))
            .unwrap();
        assert_eq!(names(temp.path(), &files), vec!["ws/link/f.txt"]);

        let files = Collector::new()
            .collect(&temp.path().join("ws/link/./f.txt"))
            .unwrap();
        assert_eq!(files, vec![temp.path().join("ws/link/f.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        touch(&temp.path().join("a.txt"));
        touch(&temp.path().join("sub/locked/secret.txt"));
        let locked = temp.path().join("sub/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list the directory anyway
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = Collector::new().collect(temp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(MergeError::Walk(_))));
    }

    #[test]
    fn test_missing_path_fails() {
        let temp = tempdir().unwrap();
        let err = Collector::new()
            .collect(&temp.path().join("missing"))
            .unwrap_err();

        assert!(matches!(err, MergeError::Io { .. }));
    }
}
