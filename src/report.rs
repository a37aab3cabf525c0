/*!
 * Reporting functionality for ctxmerge
 *
 * Renders the merge statistics either as the short completion notice,
 * as console tables built with the tabled library, or as JSON.
 */

use std::io::{self, Write};
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::{MergeError, Result};
use crate::types::MergedOutput;
use crate::utils::{estimate_tokens, format_with_separators};

/// Information about a merged file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReportInfo {
    /// Section label
    pub label: String,
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for a merge run
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Where the document went ("stdout" or a file path)
    pub output: String,
    /// Time taken to collect, read and render
    pub duration: Duration,
    pub total_files: usize,
    pub total_chars: usize,
    pub estimated_tokens: usize,
    pub file_details: Vec<FileReportInfo>,
}

impl MergeReport {
    pub fn new(output: impl Into<String>, duration: Duration, merged: &MergedOutput) -> Self {
        Self {
            output: output.into(),
            duration,
            total_files: merged.total_files,
            total_chars: merged.total_chars,
            estimated_tokens: merged.estimated_tokens,
            file_details: merged.files.clone(),
        }
    }
}

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Files and summary tables
    #[default]
    Table,
    /// The short completion notice
    Plain,
    /// Machine-readable summary
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    output: &'a str,
    duration_ms: u128,
    total_files: usize,
    total_chars: usize,
    estimated_tokens: usize,
    files: &'a [FileReportInfo],
}

/// Report generator for merge results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &MergeReport) -> Result<String> {
        Ok(match self.format {
            ReportFormat::Table => self.generate_console_report(report),
            ReportFormat::Plain => self.generate_plain_report(report),
            ReportFormat::Json => self.generate_json_report(report)?,
        })
    }

    /// Print the report to stderr, keeping stdout for the document
    pub fn print_report(&self, report: &MergeReport) -> Result<()> {
        let text = self.generate_report(report)?;
        writeln!(io::stderr(), "\n{}", text).map_err(MergeError::Output)
    }

    fn generate_plain_report(&self, report: &MergeReport) -> String {
        format!(
            "Context Merger complete\n\
             Total files: {}\n\
             Total characters: {}\n\
             Estimated tokens (1/4th): ~{}",
            report.total_files,
            format_with_separators(report.total_chars),
            format_with_separators(report.estimated_tokens)
        )
    }

    fn generate_json_report(&self, report: &MergeReport) -> Result<String> {
        let json = JsonReport {
            output: &report.output,
            duration_ms: report.duration.as_millis(),
            total_files: report.total_files,
            total_chars: report.total_chars,
            estimated_tokens: report.estimated_tokens,
            files: &report.file_details,
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }

    // Keep the tail of long labels, where the file name is
    fn format_label(&self, label: &str, max_len: usize) -> String {
        let count = label.chars().count();
        if count <= max_len {
            return label.to_string();
        }

        let tail: String = label.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }

    fn create_summary_table(&self, report: &MergeReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: report.output.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Merged".to_string(),
                value: format_with_separators(report.total_files),
            },
            SummaryRow {
                key: "📝 Total Characters".to_string(),
                value: format_with_separators(report.total_chars),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "~{} tokens (estimated)",
                    format_with_separators(report.estimated_tokens)
                ),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &MergeReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File")]
            label: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Characters")]
            chars: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        if files.len() > 15 {
            files.sort_by(|a, b| b.chars.cmp(&a.chars));
            files.truncate(10);
        }

        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|info| FileRow {
                label: self.format_label(&info.label, 60),
                lines: format_with_separators(info.lines),
                chars: format_with_separators(info.chars),
                tokens: format_with_separators(estimate_tokens(info.chars)),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &MergeReport) -> String {
        let files_table = self.create_files_table(report);
        let summary_table = self.create_summary_table(report);

        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  MERGED FILES"
        };
        let summary_title = "✅  CONTEXT MERGE COMPLETE";

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
