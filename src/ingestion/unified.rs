//! Path-based ingestion entry points.
//!
//! Most callers should use [`ingest_records`], which decodes a file straight into typed entities.
//! [`ingest_from_path`] stops at the untyped [`crate::types::DataSet`].
//!
//! - [`IngestionOptions::delimiter`] selects the field separator (comma by default).
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::IngestionResult;
use crate::record::Record;
use crate::types::{DataSet, Schema};

use super::csv::{ingest_csv_from_reader, reader_from_path, DEFAULT_DELIMITER};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Options controlling ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Ingest a delimited file into an untyped [`DataSet`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use simple_data_tool::ingestion::{ingest_from_path, IngestionOptions, IngestionSeverity, LogObserver};
/// use simple_data_tool::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), simple_data_tool::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("id", DataType::Int64),
///     Field::new("state", DataType::Utf8),
/// ]);
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(LogObserver)),
///     alert_at_or_above: IngestionSeverity::Error,
///     ..Default::default()
/// };
///
/// let ds = ingest_from_path("agents.csv", &schema, &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        entity: None,
    };
    let result = decode_path(path, schema, options);
    report(options, &ctx, result.as_ref().map(DataSet::row_count));
    result
}

/// Ingest a delimited file directly into typed entities, preserving row order.
///
/// ```no_run
/// use simple_data_tool::ingestion::{ingest_records, IngestionOptions};
/// use simple_data_tool::model::Customer;
///
/// # fn main() -> Result<(), simple_data_tool::IngestionError> {
/// let customers: Vec<Customer> = ingest_records("customers.csv", &IngestionOptions::default())?;
/// println!("first={:?}", customers.first().map(|c| &c.first_name));
/// # Ok(())
/// # }
/// ```
pub fn ingest_records<T: Record>(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<Vec<T>> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        entity: Some(T::ENTITY),
    };
    let result = decode_path(path, &T::schema(), options).and_then(DataSet::into_records::<T>);
    report(options, &ctx, result.as_ref().map(Vec::len));
    result
}

fn decode_path(path: &Path, schema: &Schema, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let mut rdr = reader_from_path(path, options.delimiter)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

fn report(
    options: &IngestionOptions,
    ctx: &IngestionContext,
    outcome: Result<usize, &crate::error::IngestionError>,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match outcome {
        Ok(rows) => obs.on_success(ctx, IngestionStats { rows }),
        Err(e) => {
            let sev = IngestionSeverity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue ingestion work in a job system.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Create a request with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: IngestionOptions::default(),
        }
    }

    /// Execute the request by calling [`ingest_records`].
    pub fn run<T: Record>(&self) -> IngestionResult<Vec<T>> {
        ingest_records(&self.path, &self.options)
    }
}
