//! Compile-time field tables for typed entities.
//!
//! An entity shape is a plain struct plus a static table mapping each CSV header name to a
//! typed field. The [`record!`](crate::record!) macro writes both from a single field list, so
//! the decoder never needs entity-specific code: it builds a [`Schema`] from
//! [`Record::FIELDS`], produces an untyped [`DataSet`], and hands each row to
//! [`Record::from_values`].
//!
//! ```rust
//! use simple_data_tool::record::Record;
//! use simple_data_tool::types::DataType;
//!
//! simple_data_tool::record! {
//!     /// A branch office.
//!     pub struct Office keyed by id {
//!         id: i64 => "id",
//!         city: String => "city",
//!         headcount: i64 => "headcount",
//!     }
//! }
//!
//! assert_eq!(Office::FIELDS[2].name, "headcount");
//! assert_eq!(Office::FIELDS[2].data_type, DataType::Int64);
//! ```

use std::collections::HashSet;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// A Rust type that a schema field can decode into.
pub trait FieldType: Sized {
    /// Logical type the decoder parses the raw cell as.
    const DATA_TYPE: DataType;

    /// Extract `Self` from a decoded value. Returns `None` on a type mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

impl FieldType for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for f64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float64(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for String {
    const DATA_TYPE: DataType = DataType::Utf8;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Utf8(v) => Some(v),
            _ => None,
        }
    }
}

/// A typed entity decodable from a header-tagged source.
///
/// Implement through [`record!`](crate::record!) rather than by hand.
pub trait Record: Sized {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Header name and type of every field, in struct declaration order.
    const FIELDS: &'static [Field];

    /// Build a value from a row laid out in [`Self::FIELDS`] order.
    fn from_values(values: Vec<Value>) -> Option<Self>;

    /// Primary key; unique within a decoded collection.
    fn primary_key(&self) -> i64;

    /// Entity-level constraint check run after a row is converted.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Schema the decoder uses to read this entity.
    fn schema() -> Schema {
        Schema::new(Self::FIELDS.to_vec())
    }
}

/// Declare an entity struct together with its [`Record`] implementation.
///
/// Each field is written `name: Type => "header"`, where `Type` implements [`FieldType`].
/// `keyed by <field>` names the `i64` primary key; an optional `validate with <fn>` adds an
/// entity-level check of signature `fn(&Self) -> Result<(), String>`.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident keyed by $key:ident $(, validate with $validate:path)? {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $header:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, $crate::__serde::Serialize)]
        #[serde(crate = "simple_data_tool::__serde")]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl $crate::record::Record for $name {
            const ENTITY: &'static str = stringify!($name);

            const FIELDS: &'static [$crate::types::Field] = &[
                $(
                    $crate::types::Field::new(
                        $header,
                        <$ty as $crate::record::FieldType>::DATA_TYPE,
                    ),
                )+
            ];

            fn from_values(values: ::std::vec::Vec<$crate::types::Value>) -> ::std::option::Option<Self> {
                let mut values = values.into_iter();
                ::std::option::Option::Some(Self {
                    $(
                        $field: <$ty as $crate::record::FieldType>::from_value(values.next()?)?,
                    )+
                })
            }

            fn primary_key(&self) -> i64 {
                self.$key
            }

            $(
                fn validate(&self) -> ::std::result::Result<(), ::std::string::String> {
                    $validate(self)
                }
            )?
        }
    };
}

impl DataSet {
    /// Convert every row into a `T`, preserving row order.
    ///
    /// The dataset must have been decoded with [`Record::schema`]. Fails on the first row that
    /// does not convert, does not validate, or repeats an earlier primary key.
    pub fn into_records<T: Record>(self) -> IngestionResult<Vec<T>> {
        if self.schema.fields.as_slice() != T::FIELDS {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "dataset columns {:?} do not match {} fields",
                    self.schema.field_names().collect::<Vec<_>>(),
                    T::ENTITY
                ),
            });
        }

        let mut seen = HashSet::with_capacity(self.rows.len());
        let mut out = Vec::with_capacity(self.rows.len());
        for (row_idx0, row) in self.rows.into_iter().enumerate() {
            // Same numbering as the CSV decoder: header is row 1.
            let user_row = row_idx0 + 2;

            let record = T::from_values(row).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {user_row} does not match {} field types", T::ENTITY),
            })?;
            record
                .validate()
                .map_err(|message| IngestionError::InvalidRecord {
                    entity: T::ENTITY,
                    row: user_row,
                    message,
                })?;
            let key = record.primary_key();
            if !seen.insert(key) {
                return Err(IngestionError::DuplicateKey {
                    entity: T::ENTITY,
                    row: user_row,
                    key,
                });
            }
            out.push(record);
        }

        Ok(out)
    }
}
