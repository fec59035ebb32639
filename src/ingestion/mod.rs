//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_records`] (from [`unified`]) which:
//!
//! - decodes a header-tagged delimited file into typed entities
//! - matches columns by header name, so column order in the file does not matter
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! The untyped CSV layer is available under [`csv`].

pub mod csv;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, LogObserver,
};
pub use unified::{ingest_from_path, ingest_records, IngestionOptions, IngestionRequest};
