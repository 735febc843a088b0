use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type returned by ingestion functions.
///
/// Per-row and per-cell anomalies never surface here; they are absorbed with default values.
/// Only structural failures (unknown format, unreadable workbook, I/O) abort an ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text tokenizer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Workbook could not be opened or its first sheet could not be read.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The workbook opened but contains no worksheets.
    #[error("workbook has no sheets")]
    NoSheets,

    /// Workbook ingestion was compiled out (cargo feature `excel` disabled).
    #[error("workbook ingestion not enabled (enable cargo feature 'excel')")]
    WorkbookSupportDisabled,

    /// The file extension maps to no known ingestion format.
    #[error("unsupported file format '.{extension}' for '{file_name}': expected a CSV or Excel file")]
    UnsupportedFormat { file_name: String, extension: String },

    /// A structural failure while ingesting a named file.
    #[error("failed to parse '{file_name}': {source}")]
    InFile {
        file_name: String,
        #[source]
        source: Box<IngestionError>,
    },
}

impl IngestionError {
    /// Attach the offending file name, unless the error already names it.
    pub fn in_file(self, file_name: &str) -> Self {
        match self {
            err @ (IngestionError::UnsupportedFormat { .. } | IngestionError::InFile { .. }) => err,
            other => IngestionError::InFile {
                file_name: file_name.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping file-name labels.
    pub fn root(&self) -> &IngestionError {
        match self {
            IngestionError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Error type returned by [`crate::store::RecordStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing document does not exist yet.
    #[error("record store not found at {}", path.display())]
    Missing { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not valid JSON, or not an array of flat objects.
    #[error("invalid record store document: {0}")]
    Json(#[from] serde_json::Error),
}
