//! Global error handling for ctxmerge
//!
//! A single error type covers the whole merge pipeline. The two "nothing to
//! do" outcomes are modelled as errors too, so every abort point of the
//! pipeline flows through `?`; callers use [`MergeError::is_warning`] to tell
//! them apart from real failures.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for ctxmerge operations
#[derive(Error, Debug)]
pub enum MergeError {
    /// Neither a multi-select list nor a focused item was supplied
    #[error("No files or folders selected.")]
    EmptySelection,

    /// The selection resolved to zero eligible files
    #[error("No valid files found.")]
    EmptyResultSet,

    /// Stat, path resolution or read failure on a specific path
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory listing failure
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Failure while presenting the document
    #[error("Output error: {0}")]
    Output(#[source] io::Error),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// JSON report serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MergeError {
    /// Whether this is one of the user-facing "nothing to merge" warnings
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptySelection | Self::EmptyResultSet)
    }
}

/// Specialized Result type for ctxmerge operations
pub type Result<T> = std::result::Result<T, MergeError>;

/// Creates a MergeError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::MergeError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching the offending path to I/O errors
pub trait ResultExt<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
