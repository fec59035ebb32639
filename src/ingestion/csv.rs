//! CSV decoding implementation.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::debug;

use crate::error::{IngestionError, IngestionResult};
use crate::record::Record;
use crate::types::{DataSet, DataType, Schema, Value};

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ, extra columns are ignored).
/// - Every data row must have as many fields as the header.
/// - Each value is parsed according to the schema field type.
///
/// The file is opened for the duration of the call only.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = reader_from_path(path.as_ref(), DEFAULT_DELIMITER)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(true)`. Building it with `flexible(true)` lets
/// short or long rows surface as [`IngestionError::FieldCount`] instead of a generic CSV error.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result.map_err(|e| field_count_error(e, user_row))?;

        if record.len() != headers.len() {
            return Err(IngestionError::FieldCount {
                row: user_row,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    debug!("decoded {} rows with {} columns", rows.len(), schema.fields.len());
    Ok(DataSet::new(schema.clone(), rows))
}

/// Decode every row of a CSV reader into a typed entity.
///
/// ```rust
/// use simple_data_tool::ingestion::csv::read_records;
/// use simple_data_tool::model::Claim;
///
/// let input = "policyId,id,claimType,isClaimOpen\n10,1,Hail,TRUE\n11,2,Theft,false\n";
/// let claims: Vec<Claim> = read_records(input.as_bytes()).unwrap();
/// assert_eq!(claims.len(), 2);
/// assert!(claims[0].is_claim_open);
/// assert_eq!(claims[1].policy_id, 11);
/// ```
pub fn read_records<T: Record>(input: impl Read) -> IngestionResult<Vec<T>> {
    let mut rdr = reader_builder(DEFAULT_DELIMITER).from_reader(input);
    ingest_csv_from_reader(&mut rdr, &T::schema())?.into_records()
}

/// Decode every row of a CSV file into a typed entity.
pub fn read_records_from_path<T: Record>(path: impl AsRef<Path>) -> IngestionResult<Vec<T>> {
    ingest_csv_from_path(path, &T::schema())?.into_records()
}

pub(crate) fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter);
    builder
}

pub(crate) fn reader_from_path(path: &Path, delimiter: u8) -> IngestionResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => IngestionError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => IngestionError::Io(e),
    })?;
    Ok(reader_builder(delimiter).from_reader(file))
}

fn field_count_error(e: csv::Error, row: usize) -> IngestionError {
    match e.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => IngestionError::FieldCount {
            row,
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => IngestionError::Csv(e),
    }
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    let parse_error = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    if trimmed.is_empty() && data_type != DataType::Utf8 {
        return Err(parse_error("empty value".to_string()));
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err("expected bool (true/false)".to_string())
    }
}
