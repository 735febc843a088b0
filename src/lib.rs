//! `unit-ledger` ingests tabular unit listings whose schema is not known ahead of time and
//! queries the resulting records.
//!
//! ## Ingestion
//!
//! [`ingestion::ingest_bytes`] takes a file name and its content and returns a
//! [`types::ParseResult`]: open-schema [`types::Record`]s, the column names in source order, and a
//! [`types::FieldInfo`] (number/string, label, example) per column.
//!
//! **Formats (by extension):**
//!
//! - **Delimited text**: `.csv`, `.tsv`, `.txt`. The delimiter (`,` `;` tab `|`) is sniffed from
//!   the first line. Blank lines are skipped; short rows are padded with empty strings.
//! - **Workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`,
//!   `.ods`. First sheet only. The header row is the first non-empty row among the first 10;
//!   rows with more than half of their columns empty are dropped.
//!
//! ```rust
//! use unit_ledger::ingestion::{ingest_bytes, IngestionOptions};
//! use unit_ledger::types::{FieldType, Value};
//!
//! # fn main() -> Result<(), unit_ledger::IngestionError> {
//! let csv = b"Name;Price;Rooms\nAcme;100;2\nBeta;;3\n";
//! let parsed = ingest_bytes("units.csv", csv, &IngestionOptions::default())?;
//!
//! assert_eq!(parsed.fields, vec!["Name", "Price", "Rooms"]);
//! assert_eq!(parsed.data[1].get("Price"), Some(&Value::text("")));
//! assert_eq!(parsed.field_info("Price").unwrap().field_type, FieldType::Number);
//! # Ok(())
//! # }
//! ```
//!
//! ## Querying
//!
//! [`query::run_query`] filters a record collection (free-text search, price and area ranges,
//! location/rooms/type/status equality), slices one page, and lists the distinct values of each
//! categorical column over the unfiltered collection. [`query::query_store`] does the same
//! against a [`store::RecordStore`] and turns storage failures into an error field.
//!
//! ```rust
//! use unit_ledger::query::{query_store, FieldMapping, FilterQuery, Pagination};
//! use unit_ledger::store::{import_records, AppendAll, MemoryStore};
//! use unit_ledger::types::Record;
//!
//! let store = MemoryStore::default();
//! import_records(
//!     &store,
//!     vec![
//!         Record::from_iter([("Unit Name", "A-101"), ("Unit Status", "Available")]),
//!         Record::from_iter([("Unit Name", "A-102"), ("Unit Status", "Sold")]),
//!     ],
//!     &AppendAll,
//! )
//! .unwrap();
//!
//! let params = [("unitStatus", "sold"), ("page", "1")];
//! let resp = query_store(
//!     &store,
//!     &FilterQuery::from_params(&params),
//!     Pagination::from_params(&params),
//!     &FieldMapping::default(),
//! );
//! assert_eq!(resp.total, 1);
//! assert_eq!(resp.filter_options.status_options, vec!["Available", "Sold"]);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format dispatch, delimited and workbook parsers, observer hooks
//! - [`infer`]: numeric coercion and per-column type inference
//! - [`query`]: filters, facets, pagination, request-parameter parsing
//! - [`store`]: record store trait, in-memory and JSON-file stores, import enrichment
//! - [`types`]: records, values and parse results
//! - [`error`]: error types

pub mod error;
pub mod infer;
pub mod ingestion;
pub mod query;
pub mod store;
pub mod types;

pub use error::{IngestionError, IngestionResult, StoreError, StoreResult};
