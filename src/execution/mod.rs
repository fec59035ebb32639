//! Execution engine for loading snapshots and running query batches in parallel.
//!
//! This module sits "above" [`crate::query`] and provides:
//!
//! - Parallel decoding of the four source files into one [`Snapshot`]
//! - Parallel evaluation of independent [`Query`] values against a shared, read-only snapshot
//! - Running metrics + observer hooks for monitoring
//!
//! Queries never mutate a snapshot, so any number of them can read it at once.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::error::IngestionResult;
use crate::query::{Query, QueryOutput};
use crate::sources::{DataSources, Snapshot};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, LogExecutionObserver,
};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

/// A configurable execution engine for snapshot loading and query batches.
pub struct ExecutionEngine {
    pool: ThreadPool,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads == Some(0)` or the thread pool cannot be built. Use
    /// [`Self::try_new`] to handle pool errors instead.
    pub fn new(opts: ExecutionOptions) -> Self {
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }
        Self::try_new(opts).expect("failed to build rayon thread pool")
    }

    /// Create a new engine, returning the pool error if the worker threads cannot be spawned.
    pub fn try_new(opts: ExecutionOptions) -> Result<Self, ThreadPoolBuildError> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to running execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Decode all four source files concurrently.
    ///
    /// Each file is decoded on its own task; if any decode fails the first error (in
    /// agents, customers, policies, claims order) is returned and no snapshot is produced.
    pub fn load_snapshot(&self, sources: &DataSources) -> IngestionResult<Snapshot> {
        let start = Instant::now();

        let ((agents, customers), (policies, claims)) = self.pool.install(|| {
            rayon::join(
                || rayon::join(|| sources.load_agents(), || sources.load_customers()),
                || rayon::join(|| sources.load_policies(), || sources.load_claims()),
            )
        });

        let snapshot = Snapshot {
            agents: agents?,
            customers: customers?,
            policies: policies?,
            claims: claims?,
        };

        self.metrics.on_snapshot_loaded();
        self.emit(ExecutionEvent::SnapshotLoaded {
            entities: snapshot.entity_count(),
            elapsed: start.elapsed(),
        });
        Ok(snapshot)
    }

    /// Evaluate every query against `snapshot` in parallel.
    ///
    /// Outputs are returned in the same order as `queries`.
    pub fn run_batch(&self, snapshot: &Snapshot, queries: &[Query]) -> Vec<QueryOutput> {
        let start = Instant::now();
        self.metrics.on_batch();
        self.emit(ExecutionEvent::BatchStarted {
            queries: queries.len(),
        });

        let outputs = self.pool.install(|| {
            queries
                .par_iter()
                .enumerate()
                .map(|(index, query)| {
                    let started = Instant::now();
                    let out = query.evaluate(snapshot);
                    let elapsed = started.elapsed();
                    self.metrics.on_query(elapsed);
                    self.emit(ExecutionEvent::QueryFinished {
                        index,
                        op: query.name(),
                        elapsed,
                    });
                    out
                })
                .collect::<Vec<_>>()
        });

        self.emit(ExecutionEvent::BatchFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        outputs
    }

    /// Load a snapshot from `sources` and run `queries` against it.
    pub fn run(&self, sources: &DataSources, queries: &[Query]) -> IngestionResult<Vec<QueryOutput>> {
        let snapshot = self.load_snapshot(sources)?;
        Ok(self.run_batch(&snapshot, queries))
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(o) = &self.observer {
            o.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::query::test_support::{agent, claim, customer, policy};

    #[derive(Default)]
    struct Recorder {
        ops: Mutex<Vec<&'static str>>,
    }

    impl ExecutionObserver for Recorder {
        fn on_event(&self, event: &ExecutionEvent) {
            if let ExecutionEvent::QueryFinished { op, .. } = event {
                self.ops.lock().unwrap().push(*op);
            }
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            agents: vec![agent(1, "TX"), agent(2, "TX"), agent(3, "AZ")],
            customers: vec![customer(1, "A", "B", "TX", 1), customer(2, "C", "D", "AZ", 3)],
            policies: vec![policy(1, 1, 12.0), policy(2, 2, 8.0)],
            claims: vec![claim(1, 1, true), claim(2, 2, true), claim(3, 2, false)],
        }
    }

    #[test]
    fn batch_outputs_follow_query_order() {
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(4),
        });
        let queries: Vec<Query> = (0..32)
            .map(|i| {
                if i % 2 == 0 {
                    Query::CountAgentsForState { state: "TX".to_string() }
                } else {
                    Query::SumMonthlyPremiumForCustomer { customer_id: 2 }
                }
            })
            .collect();

        let outputs = engine.run_batch(&snapshot(), &queries);

        assert_eq!(outputs.len(), 32);
        for (i, out) in outputs.iter().enumerate() {
            let expected = if i % 2 == 0 {
                QueryOutput::Count(2)
            } else {
                QueryOutput::Premium(8.0)
            };
            assert_eq!(out, &expected);
        }
        let m = engine.metrics().snapshot();
        assert_eq!(m.batches_run, 1);
        assert_eq!(m.queries_run, 32);
    }

    #[test]
    fn observer_sees_every_query() {
        let recorder = Arc::new(Recorder::default());
        let engine = ExecutionEngine::new(ExecutionOptions { num_threads: Some(2) })
            .with_observer(recorder.clone());

        let queries = vec![Query::CountOpenClaims, Query::TotalPremiumByAgent];
        let outputs = engine.run_batch(&snapshot(), &queries);
        assert_eq!(outputs[0], QueryOutput::Count(2));

        let mut ops = recorder.ops.lock().unwrap().clone();
        ops.sort_unstable();
        assert_eq!(ops, vec!["count_open_claims", "total_premium_by_agent"]);
    }

    #[test]
    #[should_panic(expected = "num_threads must be > 0")]
    fn zero_threads_is_rejected() {
        let _ = ExecutionEngine::new(ExecutionOptions { num_threads: Some(0) });
    }
}
