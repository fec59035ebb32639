use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::{debug, info};

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    SnapshotLoaded {
        entities: usize,
        elapsed: Duration,
    },
    BatchStarted {
        queries: usize,
    },
    QueryFinished {
        index: usize,
        op: &'static str,
        elapsed: Duration,
    },
    BatchFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Logs execution events through the `log` facade.
#[derive(Debug, Default)]
pub struct LogExecutionObserver;

impl ExecutionObserver for LogExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::QueryFinished { .. } => debug!("{event:?}"),
            ExecutionEvent::BatchFinished { elapsed, metrics } => {
                info!("batch finished in {elapsed:?}: {metrics}")
            }
            _ => info!("{event:?}"),
        }
    }
}

/// Running counters for an engine.
///
/// The engine updates these counters while it works; callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    snapshots_loaded: AtomicU64,
    batches_run: AtomicU64,
    queries_run: AtomicU64,
    query_time_ns: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_snapshot_loaded(&self) {
        let _ = self.snapshots_loaded.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_batch(&self) {
        let _ = self.batches_run.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_query(&self, elapsed: Duration) {
        let _ = self.queries_run.fetch_add(1, Ordering::SeqCst);
        let add = elapsed.as_nanos().min(u64::MAX as u128) as u64;
        let _ = self.query_time_ns.fetch_add(add, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        ExecutionMetricsSnapshot {
            snapshots_loaded: self.snapshots_loaded.load(Ordering::SeqCst),
            batches_run: self.batches_run.load(Ordering::SeqCst),
            queries_run: self.queries_run.load(Ordering::SeqCst),
            query_time: Duration::from_nanos(self.query_time_ns.load(Ordering::SeqCst)),
        }
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub snapshots_loaded: u64,
    pub batches_run: u64,
    pub queries_run: u64,
    /// Summed across worker threads, so it can exceed wall-clock time.
    pub query_time: Duration,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "snapshots_loaded={}, batches_run={}, queries_run={}, query_time={:?}",
            self.snapshots_loaded, self.batches_run, self.queries_run, self.query_time
        )
    }
}
