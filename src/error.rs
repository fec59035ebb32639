use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion and query operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Every path-driven query propagates this unchanged: a source either decodes completely or the
/// whole operation fails with one of these.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The input path does not resolve to a file.
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Underlying I/O error (e.g. permission denied, read failure).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (invalid UTF-8, broken quoting, I/O while reading records).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not conform to the provided schema (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A data row has a different number of fields than the header.
    #[error("malformed record at row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Two rows of the same entity share a primary key.
    #[error("duplicate {entity} id {key} at row {row}")]
    DuplicateKey {
        entity: &'static str,
        row: usize,
        key: i64,
    },

    /// A fully parsed row violates an entity-level constraint.
    #[error("invalid {entity} at row {row}: {message}")]
    InvalidRecord {
        entity: &'static str,
        row: usize,
        message: String,
    },

    /// A JSON configuration or batch file could not be read.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Error type returned by the SQLite loader.
#[cfg(feature = "sqlite")]
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Database error raised by SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The collections to persist could not be decoded.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
}
