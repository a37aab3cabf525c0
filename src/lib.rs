/*!
 * ctxmerge - Merge selected files and folders into one Markdown document
 *
 * This library walks the selected paths, deduplicates the files it finds,
 * and renders each one as a labeled fenced section, for use as context
 * for Large Language Models.
 */

pub mod clipboard;
pub mod collector;
pub mod config;
pub mod error;
pub mod merger;
pub mod report;
pub mod types;
pub mod utils;
pub mod workspace;
pub mod writer;


// Re-export main components for easier access
pub use collector::Collector;
pub use config::Config;
pub use error::{MergeError, Result};
pub use merger::{render_section, Merger};
pub use report::{FileReportInfo, MergeReport, ReportFormat, Reporter};
pub use types::{FileRecord, FileSet, MergedOutput, Selection};
pub use utils::{estimate_tokens, format_with_separators};
pub use workspace::{LabelResolver, WorkspaceLabel, WorkspaceRoot, WorkspaceRoots};
pub use writer::MarkdownWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
