//! Delimited text ingestion (`.csv`, `.tsv`, `.txt`).
//!
//! The delimiter is sniffed from the first line. Every line is trimmed, then split with it (no
//! quoting rules), and each token is trimmed and unwrapped from one pair of matching quotes.
//! Values are stored as text; numeric coercion only happens during type inference and at query
//! time.
//!
//! Lines that are blank after trimming are skipped. Any other row is kept, with missing trailing
//! columns filled with the empty string.

use tracing::debug;

use crate::error::IngestionResult;
use crate::infer::{LabelStyle, detect_fields};
use crate::types::{ParseResult, Record, Value};

use super::ParseOutcome;
use super::headers::{clean_token, finalize_headers};

/// Delimiters tried by [`sniff_delimiter`], in priority order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the candidate delimiter that splits `first_line` into the most tokens.
///
/// Ties go to the earlier candidate, so a line without any candidate yields `,`.
pub fn sniff_delimiter(first_line: &str) -> u8 {
    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;
    for d in CANDIDATE_DELIMITERS {
        let count = first_line.split(char::from(d)).count();
        if count > best_count {
            best_count = count;
            best = d;
        }
    }
    best
}

/// Ingest delimited text held in memory.
pub fn parse_delimited_str(text: &str) -> IngestionResult<ParseResult> {
    parse_delimited(text).map(|o| o.result)
}

/// Decode raw bytes (UTF-8, lossy, optional BOM) and ingest them as delimited text.
pub fn parse_delimited_bytes(bytes: &[u8]) -> IngestionResult<ParseResult> {
    parse_delimited(&decode_text(bytes)).map(|o| o.result)
}

pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

pub(crate) fn parse_delimited(text: &str) -> IngestionResult<ParseOutcome> {
    let mut skipped_rows = 0;
    let mut lines = Vec::new();
    for line in text.trim().lines().map(str::trim) {
        if line.is_empty() {
            skipped_rows += 1;
        } else {
            lines.push(line);
        }
    }
    let Some(first_line) = lines.first() else {
        return Ok(ParseOutcome::default());
    };

    let delimiter = sniff_delimiter(first_line);
    debug!(delimiter = %char::from(delimiter).escape_default(), "sniffed delimiter");

    // One non-empty line per record, so the tokenizer never sees a blank line.
    let body = lines.join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut rows = rdr.records();
    let headers = match rows.next() {
        Some(header) => {
            let header = header?;
            finalize_headers(header.iter().map(|h| clean_token(h).to_owned()).collect())
        }
        None => return Ok(ParseOutcome::default()),
    };
    debug!(?headers, "delimited headers");

    let mut data = Vec::new();
    for row in rows {
        let row = row?;
        let mut record = Record::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let token = row.get(idx).map(clean_token).unwrap_or("");
            record.insert(header.clone(), Value::text(token));
        }
        data.push(record);
    }
    debug!(rows = data.len(), skipped_rows, "parsed delimited rows");

    let detected_fields = detect_fields(&data, &headers, LabelStyle::Verbatim);
    Ok(ParseOutcome {
        result: ParseResult {
            data,
            fields: headers,
            detected_fields,
        },
        skipped_rows,
    })
}
