//! Error types for project files, CSV interchange and settings.
//!
//! The geometry modules never return these: their guards are expressed as
//! `Option` or small dedicated rejection types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the fallible (I/O facing) parts of the crate.
#[derive(Error, Debug)]
pub enum GanttError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A project or settings file was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV file lacks the columns needed to build tasks.
    #[error("CSV is missing required columns (found {found:?}); need a task name, a start date and an end date or duration")]
    MissingColumns {
        /// The headers that were present.
        found: Vec<String>,
    },

    /// A CSV file had no usable rows.
    #[error("no valid tasks found in CSV ({skipped} rows skipped)")]
    NoValidRows {
        /// Rows that were rejected.
        skipped: usize,
    },

    /// Task data that cannot be represented (e.g. an end before its start).
    #[error("invalid task '{name}': {reason}")]
    InvalidTask {
        /// Name of the offending task.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The OS config directory could not be determined.
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

impl GanttError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GanttError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GanttError>;
