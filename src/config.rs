/*!
 * Configuration handling for ctxmerge
 */

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::{Result, ResultExt};
use crate::report::ReportFormat;
use crate::types::Selection;
use crate::utils::absolute_path;
use crate::workspace::{WorkspaceRoot, WorkspaceRoots};

/// Command-line arguments for ctxmerge
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "ctxmerge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Merge selected files and folders into a single Markdown document",
    long_about = "Concatenates the text of the selected files and folders into one Markdown document, one fenced section per file, labeled with its workspace-relative path. Folders are walked recursively; node_modules, .git, dist, build, .next and out are always skipped."
)]
pub struct Args {
    /// Files and folders to merge
    pub paths: Vec<String>,

    /// Focused item, used when no PATHS are given
    #[clap(long, value_name = "PATH")]
    pub focus: Option<String>,

    /// Write the document to FILE instead of stdout
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Workspace root used for labels, as [NAME=]PATH (repeatable; defaults to the current directory)
    #[clap(long = "root", value_name = "[NAME=]PATH")]
    pub roots: Vec<String>,

    /// Label every file with its absolute path
    #[clap(long, conflicts_with = "roots")]
    pub no_workspace: bool,

    /// Keep the operating system's directory listing order
    #[clap(long)]
    pub unsorted: bool,

    /// Report format printed to stderr after merging
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,

    /// Do not print a report
    #[clap(long, conflicts_with = "report")]
    pub no_report: bool,

    /// Copy the document to the system clipboard
    #[clap(long)]
    pub clip: bool,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// What to merge
    pub selection: Selection,

    /// Output file; `None` writes to stdout
    pub output_file: Option<PathBuf>,

    /// Roots used to build section labels
    pub workspace: WorkspaceRoots,

    /// Sort directory listings by file name
    pub sort_entries: bool,

    /// Report format; `None` disables the report
    pub report: Option<ReportFormat>,

    /// Copy output to clipboard
    pub clip: bool,

    /// Debug logging
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let workspace = if args.no_workspace {
            WorkspaceRoots::none()
        } else if args.roots.is_empty() {
            let cwd = env::current_dir().with_path(Path::new("."))?;
            WorkspaceRoots::current(&cwd)?
        } else {
            WorkspaceRoots::new(
                args.roots
                    .iter()
                    .map(|spec| spec.parse())
                    .collect::<Result<Vec<WorkspaceRoot>>>()?,
            )
        };

        Ok(Self {
            selection: Selection {
                focused: args.focus.map(PathBuf::from),
                selected: args.paths.into_iter().map(PathBuf::from).collect(),
            },
            output_file: args.output.map(PathBuf::from),
            workspace,
            sort_entries: !args.unsorted,
            report: (!args.no_report).then_some(args.report),
            clip: args.clip,
            verbose: args.verbose,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(output) = &self.output_file {
            crate::ensure!(
                !output.is_dir(),
                Config,
                "Output path is a directory: {}",
                output.display()
            );

            if let Some(parent) = output.parent() {
                crate::ensure!(
                    parent.as_os_str().is_empty() || parent.is_dir(),
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }

    /// Absolute form of the output file, used to keep it out of the merge
    pub fn resolved_output(&self) -> Result<Option<PathBuf>> {
        self.output_file
            .as_deref()
            .map(|output| absolute_path(output).with_path(output))
            .transpose()
    }

    /// Human-readable output target for reports
    pub fn output_display(&self) -> String {
        self.output_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    }
}
