//! Workspace roots and section labels
//!
//! A file that lives under a known workspace root is labeled
//! `<root-name>/<relative-path>`; anything else keeps its absolute path.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{MergeError, Result, ResultExt};
use crate::utils::{absolute_path, normalize_path};

/// Workspace membership of a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLabel {
    pub root_name: String,
    /// Path relative to the root, `/`-separated
    pub relative: String,
}

/// Maps a file path to its workspace, if it has one
pub trait LabelResolver {
    fn resolve(&self, path: &Path) -> Option<WorkspaceLabel>;

    /// Heading label for `path`
    fn label(&self, path: &Path) -> String {
        match self.resolve(path) {
            Some(ws) => format!("{}/{}", ws.root_name, ws.relative),
            None => path.to_string_lossy().into_owned(),
        }
    }
}

impl<F> LabelResolver for F
where
    F: Fn(&Path) -> Option<WorkspaceLabel>,
{
    fn resolve(&self, path: &Path) -> Option<WorkspaceLabel> {
        self(path)
    }
}

/// A named workspace root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoot {
    pub name: String,
    pub path: PathBuf,
}

impl WorkspaceRoot {
    /// Name the root after the final component of `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        let abs_path = absolute_path(path).with_path(path)?;
        let Some(name) = abs_path.file_name() else {
            crate::bail!(
                Config,
                "workspace root '{}' has no name, use NAME={}",
                path.display(),
                path.display()
            );
        };

        Self::named(name.to_string_lossy(), path)
    }

    /// Give the root at `path` an explicit name
    pub fn named(name: impl Into<String>, path: &Path) -> Result<Self> {
        let name = name.into();
        crate::ensure!(!name.is_empty(), Config, "workspace root name must not be empty");

        let abs_path = absolute_path(path).with_path(path)?;
        fs::metadata(&abs_path).with_path(path)?;

        Ok(Self {
            name,
            path: abs_path,
        })
    }
}

/// Parses `[NAME=]PATH`
impl FromStr for WorkspaceRoot {
    type Err = MergeError;

    fn from_str(spec: &str) -> Result<Self> {
        crate::ensure!(!spec.is_empty(), Config, "empty workspace root");

        match spec.split_once('=') {
            Some((name, path)) if !path.is_empty() => Self::named(name, Path::new(path)),
            Some(_) => crate::bail!(Config, "workspace root '{}' has no path", spec),
            None => Self::from_path(Path::new(spec)),
        }
    }
}

/// The set of workspace roots known for one invocation
#[derive(Debug, Clone, Default)]
pub struct WorkspaceRoots {
    roots: Vec<WorkspaceRoot>,
}

impl WorkspaceRoots {
    pub fn new(roots: Vec<WorkspaceRoot>) -> Self {
        Self { roots }
    }

    /// No roots: every file is labeled with its absolute path
    pub fn none() -> Self {
        Self::default()
    }

    /// The working directory as the single root
    ///
    /// The filesystem root has no name to label with, so it yields no roots.
    pub fn current(cwd: &Path) -> Result<Self> {
        if cwd.file_name().is_none() {
            return Ok(Self::none());
        }

        Ok(Self::new(vec![WorkspaceRoot::from_path(cwd)?]))
    }

    pub fn roots(&self) -> &[WorkspaceRoot] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl LabelResolver for WorkspaceRoots {
    fn resolve(&self, path: &Path) -> Option<WorkspaceLabel> {
        // Nested roots: the deepest matching root wins
        self.roots
            .iter()
            .filter_map(|root| {
                path.strip_prefix(&root.path)
                    .ok()
                    .map(|rel| (root, rel))
            })
            .filter(|(_, rel)| !rel.as_os_str().is_empty())
            .max_by_key(|(root, _)| root.path.components().count())
            .map(|(root, rel)| WorkspaceLabel {
                root_name: root.name.clone(),
                relative: normalize_path(rel),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(name: &str, path: &str) -> WorkspaceRoot {
        WorkspaceRoot {
            name: name.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_label_inside_root() {
        let roots = WorkspaceRoots::new(vec![root("app", "/work/app")]);

        assert_eq!(roots.label(Path::new("/work/app/src/main.rs")), "app/src/main.rs");
    }

    #[test]
    fn test_label_outside_root_is_absolute() {
        let roots = WorkspaceRoots::new(vec![root("app", "/work/app")]);

        assert_eq!(roots.label(Path::new("/etc/hosts")), "/etc/hosts");
        assert_eq!(roots.label(Path::new("/work/application/x")), "/work/application/x");
    }

    #[test]
    fn test_nested_roots_pick_most_specific() {
        let roots = WorkspaceRoots::new(vec![
            root("mono", "/work/mono"),
            root("web", "/work/mono/packages/web"),
        ]);

        assert_eq!(
            roots.label(Path::new("/work/mono/packages/web/index.ts")),
            "web/index.ts"
        );
        assert_eq!(
            roots.label(Path::new("/work/mono/packages/api/main.ts")),
            "mono/packages/api/main.ts"
        );
    }

    #[test]
    fn test_no_roots() {
        let roots = WorkspaceRoots::none();
        assert!(roots.is_empty());
        assert_eq!(roots.label(Path::new("/a/b.txt")), "/a/b.txt");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |path: &Path| {
            path.file_name().map(|name| WorkspaceLabel {
                root_name: "proj".to_string(),
                relative: name.to_string_lossy().into_owned(),
            })
        };

        assert_eq!(resolver.label(Path::new("/x/y/z.md")), "proj/z.md");
    }

    #[test]
    fn test_parse_root_spec() {
        let temp = tempfile::tempdir().unwrap();

        let named: WorkspaceRoot = format!("site={}", temp.path().display()).parse().unwrap();
        assert_eq!(named.name, "site");
        assert_eq!(named.path, temp.path());

        let unnamed: WorkspaceRoot = temp.path().display().to_string().parse().unwrap();
        assert_eq!(
            unnamed.name,
            temp.path().file_name().unwrap().to_string_lossy()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_root_path_keeps_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

        let root = WorkspaceRoot::from_path(&temp.path().join("alias")).unwrap();
        assert_eq!(root.name, "alias");
        assert_eq!(root.path, temp.path().join("alias"));
    }

    #[test]
    fn test_filesystem_root_needs_a_name() {
        assert!(WorkspaceRoot::from_path(Path::new("/")).is_err());

        let named = WorkspaceRoot::named("fs", Path::new("/")).unwrap();
        let roots = WorkspaceRoots::new(vec![named]);
        assert_eq!(roots.label(Path::new("/etc/hosts")), "fs/etc/hosts");
    }

    #[test]
    fn test_current_directory_root() {
        let temp = tempfile::tempdir().unwrap();
        let roots = WorkspaceRoots::current(temp.path()).unwrap();
        assert_eq!(roots.roots()[0].path, temp.path());

        let roots = WorkspaceRoots::current(Path::new("/")).unwrap();
        assert!(roots.is_empty());
        assert_eq!(roots.label(Path::new("/etc/hosts")), "/etc/hosts");
    }

    #[test]
    fn test_parse_root_spec_errors() {
        assert!("".parse::<WorkspaceRoot>().is_err());
        assert!("name=".parse::<WorkspaceRoot>().is_err());
        assert!("=/tmp".parse::<WorkspaceRoot>().is_err());
        assert!("/definitely/not/here".parse::<WorkspaceRoot>().is_err());
    }
}
