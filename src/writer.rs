/*!
 * Markdown document output for ctxmerge
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::error::{MergeError, Result, ResultExt};
use crate::types::MergedOutput;

/// Presents the merged document to the user
pub struct MarkdownWriter {
    /// Target file; stdout when `None`
    output_file: Option<PathBuf>,
}

impl MarkdownWriter {
    /// Create a new writer
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Write the document to its target
    pub fn write(&self, merged: &MergedOutput) -> Result<()> {
        match &self.output_file {
            Some(path) => {
                let file = File::create(path).with_path(path)?;
                let mut writer = BufWriter::new(file);
                writer
                    .write_all(merged.document.as_bytes())
                    .and_then(|_| writer.flush())
                    .with_path(path)?;
                info!(path = %path.display(), "Wrote merged document");
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                self.write_to(merged, &mut handle)
                    .and_then(|_| handle.write_all(b"\n"))
                    .and_then(|_| handle.flush())
                    .map_err(MergeError::Output)?;
            }
        }

        Ok(())
    }

    /// Write the document to any writer
    pub fn write_to<W: Write>(&self, merged: &MergedOutput, writer: &mut W) -> io::Result<()> {
        writer.write_all(merged.document.as_bytes())
    }
}
