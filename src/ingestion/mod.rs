//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_bytes`] (from [`unified`]) which:
//!
//! - picks delimited-text or workbook parsing from the file extension (or [`IngestionOptions`])
//! - discovers the header row and column names
//! - builds open-schema records and infers a type per column
//! - optionally reports success/warnings/failures to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under [`delimited`] and [`workbook`].

pub mod delimited;
pub mod headers;
pub mod observability;
pub mod unified;
pub mod workbook;

use crate::types::ParseResult;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, IngestionWarning,
    StdErrObserver, TracingObserver,
};
pub use unified::{IngestionFormat, IngestionOptions, file_extension, ingest_bytes, ingest_from_path};
pub use workbook::WorkbookOptions;

/// A parse result plus the number of rows the row filter dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub result: ParseResult,
    pub skipped_rows: usize,
}
