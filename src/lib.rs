//! `simple-data-tool` decodes agency extracts (agents, customers, policies, claims) from
//! header-tagged CSV files into typed records and answers a fixed set of join and aggregation
//! queries over them.
//!
//! The primary entrypoints are [`sources::DataSources`], which names the four files and runs
//! queries straight from them, and [`ingestion::ingest_records`], which decodes one file into any
//! [`record::Record`] type.
//!
//! ## Decoding
//!
//! Decoding happens in two steps, neither of which has entity-specific code:
//!
//! 1. [`ingestion::csv`] reads a header-tagged file into an untyped [`types::DataSet`] whose
//!    columns follow the target [`types::Schema`]. Columns are matched by header name, so the
//!    file's column order does not matter.
//! 2. [`types::DataSet::into_records`] converts each row into a typed entity using the entity's
//!    compile-time field table ([`record::Record::FIELDS`]).
//!
//! Supported field types are [`types::DataType::Int64`], [`types::DataType::Float64`],
//! [`types::DataType::Bool`] (`true`/`false`, any case) and [`types::DataType::Utf8`]. Empty text
//! cells decode to `""`; empty numeric or boolean cells are errors.
//!
//! Decoding is fail-fast: a missing file, a row with the wrong number of fields, an unparseable
//! value, or a duplicate id aborts the whole decode with an [`IngestionError`].
//!
//! ## Quick example
//!
//! ```no_run
//! use simple_data_tool::sources::DataSources;
//!
//! # fn main() -> Result<(), simple_data_tool::IngestionError> {
//! let sources = DataSources::in_dir("data");
//! println!("open claims: {}", sources.count_open_claims()?);
//! match sources.count_open_claims_for_customer_name("Gabbie", "Copin")? {
//!     Some(n) => println!("Gabbie Copin has {n} open claims"),
//!     None => println!("no such customer"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV decoding, path entrypoints, observer hooks
//! - [`types`]: schema + untyped dataset types
//! - [`record`]: compile-time field tables and the [`record!`] macro
//! - [`model`]: the `Agent`, `Customer`, `Policy` and `Claim` entities
//! - [`query`]: the nine query operations
//! - [`sources`]: file locations, snapshots, path-driven queries
//! - [`execution`]: parallel snapshot loading and query batches
//! - `loader` (feature `sqlite`): persistence into SQLite
//! - [`error`]: error types

// Lets `record!` expansions name this crate the same way inside and outside it.
extern crate self as simple_data_tool;

pub mod error;
pub mod execution;
pub mod ingestion;
#[cfg(feature = "sqlite")]
pub mod loader;
pub mod model;
pub mod query;
pub mod record;
pub mod sources;
pub mod types;

#[doc(hidden)]
pub use serde as __serde;

pub use error::{IngestionError, IngestionResult};
#[cfg(feature = "sqlite")]
pub use error::LoaderError;
