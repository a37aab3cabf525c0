/*!
 * Merging selected files into one Markdown document
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::collector::Collector;
use crate::error::{MergeError, Result, ResultExt};
use crate::report::FileReportInfo;
use crate::types::{canonical_key, FileRecord, FileSet, MergedOutput, Selection};
use crate::utils::{count_lines, estimate_tokens, text_length, trim_trailing_whitespace};
use crate::workspace::LabelResolver;

/// Render one file as a Markdown section
pub fn render_section(label: &str, content: &str) -> String {
    format!(
        "## {}\n\n```text\n{}\n```\n\n",
        label,
        trim_trailing_whitespace(content)
    )
}

/// Merges a selection into a single Markdown document
pub struct Merger<R> {
    collector: Collector,
    resolver: R,
    /// Canonical key of a file that must never be merged (the output file)
    skip_key: Option<String>,
    progress: Arc<ProgressBar>,
}

impl<R: LabelResolver> Merger<R> {
    /// Create a new merger
    pub fn new(collector: Collector, resolver: R, progress: Arc<ProgressBar>) -> Self {
        Self {
            collector,
            resolver,
            skip_key: None,
            progress,
        }
    }

    /// Never merge `path`, even when it lies inside a selected directory
    pub fn skipping(mut self, path: Option<&Path>) -> Self {
        self.skip_key = path.map(canonical_key);
        self
    }

    /// Collect and deduplicate the files reachable from the selection
    pub fn collect_files(&self, selection: &Selection) -> Result<FileSet> {
        let targets = selection.targets()?;
        let mut files = FileSet::new();

        for target in targets {
            let collected = self.collector.collect(target)?;
            debug!(
                target = %target.display(),
                files = collected.len(),
                "Collected selection"
            );

            for path in collected {
                let record = FileRecord::new(path);
                if self.skip_key.as_deref() == Some(record.key().as_str()) {
                    debug!(path = %record.path.display(), "Skipping output file");
                    continue;
                }
                if !files.insert(record) {
                    debug!("Duplicate file replaced in merge set");
                }
            }
        }

        Ok(files)
    }

    /// Run the whole pipeline: collect, read, render and measure
    pub fn merge(&self, selection: &Selection) -> Result<MergedOutput> {
        let files = self.collect_files(selection)?;
        if files.is_empty() {
            return Err(MergeError::EmptyResultSet);
        }
        info!(files = files.len(), "Merging files");

        self.progress.set_length(files.len() as u64);
        self.progress.set_prefix("📄 Merging");

        let mut output = String::new();
        let mut details = Vec::with_capacity(files.len());

        for mut record in files.into_records() {
            let content = record.content.insert(read_text(&record.path)?);
            let label = self.resolver.label(&record.path);
            self.progress.set_message(label.clone());

            output.push_str(&render_section(&label, content));
            details.push(FileReportInfo {
                label,
                lines: count_lines(content),
                chars: text_length(content),
            });
            self.progress.inc(1);
        }

        let total_chars = text_length(&output);
        output.truncate(trim_trailing_whitespace(&output).len());

        Ok(MergedOutput {
            document: output,
            total_files: details.len(),
            total_chars,
            estimated_tokens: estimate_tokens(total_chars),
            files: details,
        })
    }
}

/// Read a file as UTF-8, replacing invalid sequences
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_path(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
