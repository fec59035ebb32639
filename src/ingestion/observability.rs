use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info, warn};

use crate::error::IngestionError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the source is malformed).
    Error,
    /// Critical error (missing source or other I/O failure).
    Critical,
}

impl IngestionSeverity {
    /// Severity the unified entry point assigns to a failed decode.
    pub fn for_error(e: &IngestionError) -> Self {
        match e {
            IngestionError::SourceNotFound { .. } | IngestionError::Io(_) => Self::Critical,
            IngestionError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            IngestionError::SchemaMismatch { .. }
            | IngestionError::FieldCount { .. }
            | IngestionError::ParseError { .. }
            | IngestionError::DuplicateKey { .. }
            | IngestionError::InvalidRecord { .. }
            | IngestionError::Config(_) => Self::Error,
        }
    }
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path used for ingestion.
    pub path: PathBuf,
    /// Entity being decoded, when known.
    pub entity: Option<&'static str>,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of decoded rows.
    pub rows: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
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
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Reports ingestion events through the `log` facade (target `simple_data_tool::ingest`).
#[derive(Debug, Default)]
pub struct LogObserver;

const LOG_TARGET: &str = "simple_data_tool::ingest";

impl IngestionObserver for LogObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        info!(
            target: LOG_TARGET,
            "ok entity={} path={} rows={}",
            ctx.entity.unwrap_or("-"),
            ctx.path.display(),
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        warn!(
            target: LOG_TARGET,
            "{:?} entity={} path={} err={}",
            severity,
            ctx.entity.unwrap_or("-"),
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        error!(
            target: LOG_TARGET,
            "ALERT {:?} entity={} path={} err={}",
            severity,
            ctx.entity.unwrap_or("-"),
            ctx.path.display(),
            error
        );
    }
}
