use std::path::PathBuf;
use thiserror::Error;

/// Errors from snapshot resolution and spreadsheet normalization.
///
/// Per-row coercion failures are not represented here: such rows are
/// dropped and only counted.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no snapshot files matching '{prefix}*.{extension}' in {}", dir.display())]
    NoMatchingFiles {
        dir: PathBuf,
        prefix: String,
        extension: String,
    },

    #[error(
        "{count} file(s) match '{prefix}*.{extension}' in {} but none carries a YYYYMMDD_HHMMSS timestamp",
        dir.display()
    )]
    NoTimestampedFiles {
        dir: PathBuf,
        prefix: String,
        extension: String,
        count: usize,
    },

    #[error("no 'Industry' header found in any supported layout; sheets found: [{}]", sheets.join(", "))]
    MissingHeader { sheets: Vec<String> },

    #[error("sheet '{sheet}' not found; sheets found: [{}]", available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("failed to read workbook {}: {reason}", path.display())]
    Workbook { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table error: {0}")]
    Frame(String),
}

impl DataError {
    /// True for the two "no usable snapshot file" conditions.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::NoMatchingFiles { .. } | DataError::NoTimestampedFiles { .. }
        )
    }

    /// True when the workbook was readable but its layout is unsupported.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            DataError::MissingHeader { .. }
                | DataError::MissingSheet { .. }
                | DataError::MissingColumn { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        DataError::Frame(e.to_string())
    }
}
