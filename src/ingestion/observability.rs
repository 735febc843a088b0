//! Hooks for reporting ingestion outcomes.
//!
//! [`super::ingest_bytes`] reports every attempt to an optional [`IngestionObserver`]. Outcomes
//! are also always logged through `tracing`; observers exist for callers that need to count,
//! persist or alert on them.

use std::fmt;
use std::sync::Arc;

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    /// Non-fatal (e.g. the file held no rows).
    Warning,
    /// The ingestion failed because of its input.
    Error,
    /// The ingestion failed because of I/O.
    Critical,
}

impl IngestionSeverity {
    /// Severity of a failed ingestion.
    pub fn for_error(e: &IngestionError) -> Self {
        match e.root() {
            IngestionError::Io(_) => IngestionSeverity::Critical,
            IngestionError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
                _ => IngestionSeverity::Error,
            },
            _ => IngestionSeverity::Error,
        }
    }
}

/// Which file an event is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    pub file_name: String,
    /// `None` when the format could not be determined.
    pub format: Option<IngestionFormat>,
}

/// Counts reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestionStats {
    pub rows: usize,
    pub fields: usize,
    /// Blank or sparse rows that were dropped.
    pub skipped_rows: usize,
}

/// Non-fatal conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionWarning {
    /// No header or no rows were found; the result is empty.
    EmptyInput,
}

impl fmt::Display for IngestionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionWarning::EmptyInput => f.write_str("no rows found"),
        }
    }
}

/// Observer interface for ingestion outcomes.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_warning(&self, _ctx: &IngestionContext, _warning: &IngestionWarning) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a failure meets the alert threshold. Defaults to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_warning(&self, ctx: &IngestionContext, warning: &IngestionWarning) {
        self.observers.iter().for_each(|o| o.on_warning(ctx, warning));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Prints one line per event to stderr, for CLI collaborators without a subscriber.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!(
            "[ingest][ok] file={} format={:?} rows={} fields={} skipped={}",
            ctx.file_name, ctx.format, stats.rows, stats.fields, stats.skipped_rows
        );
    }

    fn on_warning(&self, ctx: &IngestionContext, warning: &IngestionWarning) {
        eprintln!("[ingest][warn] file={} format={:?} {warning}", ctx.file_name, ctx.format);
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ingest][{severity:?}] file={} format={:?} err={error}",
            ctx.file_name, ctx.format
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ALERT][ingest][{severity:?}] file={} format={:?} err={error}",
            ctx.file_name, ctx.format
        );
    }
}

/// Re-emits alerts as `tracing` error events with an `alert` marker field.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            alert = true,
            file = %ctx.file_name,
            format = ?ctx.format,
            ?severity,
            %error,
            "ingestion alert"
        );
    }
}
