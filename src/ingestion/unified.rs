//! Unified ingestion entrypoint.
//!
//! [`ingest_bytes`] takes a file name (for extension dispatch) and the file content and returns a
//! [`ParseResult`]. [`ingest_from_path`] reads the file first.
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the extension.
//! - Every attempt is logged through `tracing` and, if configured, reported to an
//!   [`IngestionObserver`].

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{IngestionError, IngestionResult};
use crate::types::ParseResult;

use super::delimited;
use super::observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, IngestionWarning,
};
use super::workbook::WorkbookOptions;
use super::ParseOutcome;

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Delimited text with a sniffed delimiter.
    Delimited,
    /// Spreadsheet workbook (feature-gated behind `excel`).
    Workbook,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Delimited),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// The lowercase text after the last `.` of a file name, or `""` when there is none.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Workbook header discovery and sparse-row settings.
    pub workbook: WorkbookOptions,
    /// Optional observer for outcomes and alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("workbook", &self.workbook)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            workbook: WorkbookOptions::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Ingest one uploaded file.
///
/// Fails only on structural problems: an unsupported extension, an unreadable workbook, or
/// I/O. Errors name the offending file. Empty or header-less input yields an empty
/// [`ParseResult`] and an [`IngestionWarning::EmptyInput`] report.
///
/// ```
/// use unit_ledger::ingestion::{ingest_bytes, IngestionOptions};
/// use unit_ledger::types::FieldType;
///
/// # fn main() -> Result<(), unit_ledger::IngestionError> {
/// let out = ingest_bytes("units.csv", b"Name,Price\nAcme,100\nBeta,\n", &IngestionOptions::default())?;
/// assert_eq!(out.fields, vec!["Name", "Price"]);
/// assert_eq!(out.row_count(), 2);
/// assert_eq!(out.field_info("Price").unwrap().field_type, FieldType::Number);
/// # Ok(())
/// # }
/// ```
pub fn ingest_bytes(
    file_name: &str,
    bytes: &[u8],
    options: &IngestionOptions,
) -> IngestionResult<ParseResult> {
    let format = match options.format {
        Some(f) => Ok(f),
        None => infer_format(file_name),
    };

    let ctx = IngestionContext {
        file_name: file_name.to_owned(),
        format: format.as_ref().ok().copied(),
    };

    let outcome = format.and_then(|fmt| match fmt {
        IngestionFormat::Delimited => delimited::parse_delimited(&delimited::decode_text(bytes)),
        IngestionFormat::Workbook => parse_workbook_dispatch(bytes, &options.workbook),
    });

    report(&ctx, options, outcome.map_err(|e| e.in_file(file_name)))
}

/// Read a file from disk and ingest it with [`ingest_bytes`].
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<ParseResult> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match fs::read(path) {
        Ok(bytes) => ingest_bytes(&file_name, &bytes, options),
        Err(e) => {
            let ctx = IngestionContext {
                format: IngestionFormat::from_extension(&file_extension(&file_name)),
                file_name: file_name.clone(),
            };
            report(&ctx, options, Err(IngestionError::from(e).in_file(&file_name)))
        }
    }
}

fn report(
    ctx: &IngestionContext,
    options: &IngestionOptions,
    outcome: IngestionResult<ParseOutcome>,
) -> IngestionResult<ParseResult> {
    let observer = options.observer.as_deref();
    match outcome {
        Ok(ParseOutcome { result, skipped_rows }) => {
            let stats = IngestionStats {
                rows: result.row_count(),
                fields: result.fields.len(),
                skipped_rows,
            };
            info!(
                file = %ctx.file_name,
                format = ?ctx.format,
                rows = stats.rows,
                fields = stats.fields,
                skipped_rows,
                "ingested file"
            );
            if result.data.is_empty() {
                warn!(file = %ctx.file_name, "no rows found");
                if let Some(obs) = observer {
                    obs.on_warning(ctx, &IngestionWarning::EmptyInput);
                }
            }
            if let Some(obs) = observer {
                obs.on_success(ctx, stats);
            }
            Ok(result)
        }
        Err(e) => {
            let severity = IngestionSeverity::for_error(&e);
            warn!(file = %ctx.file_name, ?severity, error = %e, "ingestion failed");
            if let Some(obs) = observer {
                obs.on_failure(ctx, severity, &e);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(ctx, severity, &e);
                }
            }
            Err(e)
        }
    }
}

fn infer_format(file_name: &str) -> IngestionResult<IngestionFormat> {
    let extension = file_extension(file_name);
    IngestionFormat::from_extension(&extension).ok_or_else(|| IngestionError::UnsupportedFormat {
        file_name: file_name.to_owned(),
        extension,
    })
}

fn parse_workbook_dispatch(bytes: &[u8], options: &WorkbookOptions) -> IngestionResult<ParseOutcome> {
    #[cfg(feature = "excel")]
    {
        super::workbook::parse_workbook(bytes, options)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (bytes, options);
        Err(IngestionError::WorkbookSupportDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        assert_eq!(IngestionFormat::from_extension("CSV"), Some(IngestionFormat::Delimited));
        assert_eq!(IngestionFormat::from_extension("xlsx"), Some(IngestionFormat::Workbook));
        assert_eq!(IngestionFormat::from_extension("Xls"), Some(IngestionFormat::Workbook));
        assert_eq!(IngestionFormat::from_extension("pdf"), None);
        assert_eq!(file_extension("Units.Export.XLSX"), "xlsx");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn unsupported_extension_fails_with_its_name() {
        let err = ingest_bytes("listing.pdf", b"%PDF", &IngestionOptions::default()).unwrap_err();
        match err {
            IngestionError::UnsupportedFormat { file_name, extension } => {
                assert_eq!(file_name, "listing.pdf");
                assert_eq!(extension, "pdf");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn forced_format_overrides_extension() {
        let opts = IngestionOptions {
            format: Some(IngestionFormat::Delimited),
            ..Default::default()
        };
        let out = ingest_bytes("export", b"a;b\n1;2\n", &opts).unwrap();
        assert_eq!(out.fields, vec!["a", "b"]);
    }

    #[test]
    fn empty_file_is_not_an_error() {
        let out = ingest_bytes("empty.csv", b"", &IngestionOptions::default()).unwrap();
        assert_eq!(out, ParseResult::empty());
    }

    #[cfg(feature = "excel")]
    #[test]
    fn corrupt_workbook_is_labeled_with_file_name() {
        let err = ingest_bytes("units.xlsx", b"not a zip", &IngestionOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse 'units.xlsx'"));
        assert_eq!(IngestionSeverity::for_error(&err), IngestionSeverity::Error);
    }
}
