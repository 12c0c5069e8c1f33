use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

/// Result type alias for GTF loading operations.
pub type Result<T> = std::result::Result<T, GtfError>;

/// Error types that can occur while loading a GTF file.
///
/// These are deterministic parse failures, not transient I/O faults;
/// none of them are retried and none are silently swallowed. Any of
/// them aborts the whole load with no partial result.
#[derive(Debug, Error)]
pub enum GtfError {
    /// Supplied path does not exist. Raised before any parsing begins.
    #[error("GTF file does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The fixed nine-column split failed for some line.
    #[error("failed to parse GTF body: {source}")]
    Row {
        #[source]
        source: PolarsError,
    },

    /// An attribute fragment could not be split into key and value.
    #[error("malformed attribute fragment {fragment:?}{}", row_suffix(.row))]
    Attribute {
        /// The offending fragment, as found between semicolons.
        fragment: String,
        /// Record index of the fragment, when known.
        row: Option<usize>,
    },

    /// A user-supplied column converter failed on a non-empty cell.
    #[error("converter failed for column {column:?} at row {row}: {source}")]
    Conversion {
        column: String,
        row: usize,
        #[source]
        source: anyhow::Error,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error from an internal DataFrame operation
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl GtfError {
    /// Attaches a record index to an [`GtfError::Attribute`] raised
    /// without positional context.
    pub(crate) fn with_row(self, row: usize) -> Self {
        match self {
            GtfError::Attribute { fragment, .. } => {
                GtfError::Attribute {
                    fragment,
                    row: Some(row),
                }
            },
            other => other,
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" at record {}", r))
        .unwrap_or_default()
}
