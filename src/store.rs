//! Record persistence seam.
//!
//! The query engine and the import step talk to storage through [`RecordStore`], so tests can
//! inject a [`MemoryStore`] and deployments a [`JsonFileStore`] (or their own backend).
//!
//! Stores only need to provide whole-collection reads and appends. Concurrent appends are not
//! coordinated here: [`JsonFileStore::append`] is a read-modify-write of the whole document, and
//! callers importing concurrently must serialize their imports or use a backend with atomic
//! appends.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::types::{Record, Value};

/// Whole-collection read and append access to persisted records.
pub trait RecordStore: Send + Sync {
    /// All records, in append order.
    fn load(&self) -> StoreResult<Vec<Record>>;

    /// Append `records` after the existing ones; returns how many were written.
    fn append(&self, records: Vec<Record>) -> StoreResult<usize>;

    /// Append `records` given the collection `load` just returned.
    ///
    /// Stores that rewrite the whole collection on append use `existing` instead of reading it
    /// again. The default ignores it and calls [`RecordStore::append`].
    fn append_after(&self, existing: Vec<Record>, records: Vec<Record>) -> StoreResult<usize> {
        let _ = existing;
        self.append(records)
    }
}

/// In-process store. Each instance owns its own collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> StoreResult<Vec<Record>> {
        Ok(self.records.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn append(&self, records: Vec<Record>) -> StoreResult<usize> {
        let n = records.len();
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(records);
        Ok(n)
    }
}

/// A pretty-printed JSON array of flat objects on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    /// Fails with [`StoreError::Missing`] when the document does not exist yet.
    fn load(&self) -> StoreResult<Vec<Record>> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::Missing {
                path: self.path.clone(),
            },
            _ => StoreError::Io(e),
        })?;
        let records: Vec<Record> = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), records = records.len(), "loaded record store");
        Ok(records)
    }

    fn append(&self, records: Vec<Record>) -> StoreResult<usize> {
        let existing = match self.load() {
            Ok(existing) => existing,
            Err(StoreError::Missing { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        self.append_after(existing, records)
    }

    /// Writes `existing` followed by `records` without re-reading the document.
    fn append_after(&self, mut existing: Vec<Record>, records: Vec<Record>) -> StoreResult<usize> {
        let n = records.len();
        existing.extend(records);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&existing)?)?;
        Ok(n)
    }
}

/// Decides which incoming records an import keeps.
///
/// Imports append by default, so re-importing a file duplicates its rows. No column is assumed
/// to identify a unit; callers that have one can opt into [`DedupByColumn`].
pub trait DedupHook {
    fn retain(&self, existing: &[Record], incoming: Vec<Record>) -> Vec<Record>;
}

/// Keeps everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendAll;

impl DedupHook for AppendAll {
    fn retain(&self, _existing: &[Record], incoming: Vec<Record>) -> Vec<Record> {
        incoming
    }
}

/// Drops incoming records whose `column` value already exists in the store or earlier in the
/// batch. Records with an empty value in `column` are always kept.
#[derive(Debug, Clone)]
pub struct DedupByColumn {
    pub column: String,
}

impl DedupByColumn {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }

    fn key(&self, record: &Record) -> Option<String> {
        record
            .get(&self.column)
            .filter(|v| !v.is_empty())
            .map(Value::to_string)
    }
}

impl DedupHook for DedupByColumn {
    fn retain(&self, existing: &[Record], incoming: Vec<Record>) -> Vec<Record> {
        let mut seen: HashSet<String> = existing.iter().filter_map(|r| self.key(r)).collect();
        incoming
            .into_iter()
            .filter(|r| match self.key(r) {
                Some(k) => seen.insert(k),
                None => true,
            })
            .collect()
    }
}

/// Counts from one [`import_records`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub received: usize,
    pub appended: usize,
    pub skipped_duplicates: usize,
}

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Give a record an `id` (UUID v4) and `createdAt` (RFC 3339, UTC) unless it already has them.
pub fn enrich_record(mut record: Record, now: &str) -> Record {
    if !record.get(ID_FIELD).is_some_and(Value::is_truthy) {
        record.insert(ID_FIELD, Uuid::new_v4().to_string());
    }
    if !record.get(CREATED_AT_FIELD).is_some_and(Value::is_truthy) {
        record.insert(CREATED_AT_FIELD, now);
    }
    record
}

/// Enrich, deduplicate and append a batch of parsed records.
pub fn import_records(
    store: &dyn RecordStore,
    records: Vec<Record>,
    dedup: &dyn DedupHook,
) -> StoreResult<ImportSummary> {
    let received = records.len();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let enriched: Vec<Record> = records.into_iter().map(|r| enrich_record(r, &now)).collect();

    let existing = match store.load() {
        Ok(existing) => existing,
        Err(StoreError::Missing { .. }) => Vec::new(),
        Err(e) => return Err(e),
    };
    let kept = dedup.retain(&existing, enriched);
    if kept.len() > received {
        warn!(received, kept = kept.len(), "dedup hook returned more records than it was given");
    }
    let skipped_duplicates = received.saturating_sub(kept.len());
    let appended = store.append_after(existing, kept)?;

    info!(received, appended, skipped_duplicates, "imported records");
    Ok(ImportSummary {
        received,
        appended,
        skipped_duplicates,
    })
}
