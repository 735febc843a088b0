//! Workbook ingestion (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).
//!
//! Behavior:
//! - Reads the first sheet only
//! - Keeps numeric cells as numbers; dates become RFC 3339 text; missing cells become `Null`
//! - Detects the header row as the first non-empty row within the first `header_scan_rows`
//!   physical rows (the header need not be row 0)
//! - Drops data rows where more than `sparse_row_ratio` of the header columns are empty
//! - Labels are humanized; record keys are the raw header names

use tracing::debug;

#[cfg(feature = "excel")]
use crate::error::IngestionResult;
use crate::infer::{LabelStyle, detect_fields};
use crate::types::{ParseResult, Record, Value};

use super::ParseOutcome;
use super::headers::finalize_headers;

/// A sheet materialized as physical rows of cells.
pub type Grid = Vec<Vec<Value>>;

/// Knobs for header discovery and sparse-row filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkbookOptions {
    /// How many physical rows to search for the header row.
    pub header_scan_rows: usize,
    /// A data row is dropped when `empty_cells > header_count * sparse_row_ratio`.
    pub sparse_row_ratio: f64,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            header_scan_rows: 10,
            sparse_row_ratio: 0.5,
        }
    }
}

/// Ingest an in-memory workbook.
#[cfg(feature = "excel")]
pub fn parse_workbook_bytes(bytes: &[u8], options: &WorkbookOptions) -> IngestionResult<ParseResult> {
    parse_workbook(bytes, options).map(|o| o.result)
}

#[cfg(feature = "excel")]
pub(crate) fn parse_workbook(bytes: &[u8], options: &WorkbookOptions) -> IngestionResult<ParseOutcome> {
    let grid = read_first_sheet(bytes)?;
    Ok(records_from_grid(&grid, options))
}

/// Open a workbook and read its first sheet as physical rows.
///
/// Rows above the sheet's used range are returned as empty rows, so row indexes match the
/// spreadsheet. Columns start at the used range's first column.
#[cfg(feature = "excel")]
pub fn read_first_sheet(bytes: &[u8]) -> IngestionResult<Grid> {
    use std::io::Cursor;

    use calamine::{Reader, open_workbook_auto_from_rs};

    use crate::error::IngestionError;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    if let Some(name) = workbook.sheet_names().first() {
        debug!(sheet = %name, "reading first sheet");
    }
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestionError::NoSheets)??;

    let Some((first_row, _)) = range.start() else {
        return Ok(Vec::new());
    };

    let mut grid: Grid = vec![Vec::new(); first_row as usize];
    grid.extend(range.rows().map(|row| row.iter().map(cell_value).collect::<Vec<_>>()));
    Ok(grid)
}

#[cfg(feature = "excel")]
fn cell_value(cell: &calamine::Data) -> Value {
    use calamine::{Data, DataType};
    use chrono::SecondsFormat;

    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => Value::Text(dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => Value::Text(cell.to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(e) => Value::Text(e.to_string()),
    }
}

/// Index of the first row (within the scan window) holding a non-empty cell.
pub fn find_header_row(grid: &[Vec<Value>], scan_rows: usize) -> Option<usize> {
    grid.iter()
        .take(scan_rows)
        .position(|row| row.iter().any(|c| !c.is_empty()))
}

/// Build records from a sheet grid: header discovery, sparse-row filtering, type inference.
pub fn records_from_grid(grid: &[Vec<Value>], options: &WorkbookOptions) -> ParseOutcome {
    let Some(header_idx) = find_header_row(grid, options.header_scan_rows) else {
        debug!(rows = grid.len(), "no header row found in scan window");
        return ParseOutcome::default();
    };
    debug!(header_row = header_idx, "using header row");

    let headers = finalize_headers(
        grid[header_idx]
            .iter()
            .map(|c| c.to_string().trim().to_owned())
            .collect(),
    );

    let mut data = Vec::new();
    let mut skipped_rows = 0;
    for (idx, row) in grid.iter().enumerate().skip(header_idx + 1) {
        if row.iter().all(Value::is_empty) {
            skipped_rows += 1;
            continue;
        }

        let mut record = Record::with_capacity(headers.len());
        let mut empty = 0usize;
        for (col, header) in headers.iter().enumerate() {
            let value = row.get(col).cloned().unwrap_or_else(|| Value::text(""));
            if value.is_empty() {
                empty += 1;
            }
            record.insert(header.clone(), value);
        }

        if empty as f64 > headers.len() as f64 * options.sparse_row_ratio {
            debug!(row = idx, empty, columns = headers.len(), "skipping sparse row");
            skipped_rows += 1;
            continue;
        }
        data.push(record);
    }

    let detected_fields = detect_fields(&data, &headers, LabelStyle::Humanized);
    ParseOutcome {
        result: ParseResult {
            data,
            fields: headers,
            detected_fields,
        },
        skipped_rows,
    }
}
