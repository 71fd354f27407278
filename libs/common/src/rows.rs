//! Conversion of PostgreSQL rows into JSON records

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{Column, Row, TypeInfo, postgres::PgRow};

use crate::error::{DatabaseError, DatabaseResult};

/// A single result row keyed by column name, in column order
pub type JsonRow = Map<String, Value>;

/// JSON representation chosen for a PostgreSQL column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    SmallInt,
    Int,
    BigInt,
    Real,
    Double,
    Text,
    Date,
    Timestamp,
    TimestampTz,
    Json,
}

impl ColumnKind {
    /// Map a PostgreSQL type name to its JSON representation
    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "BOOL" => Self::Bool,
            "INT2" => Self::SmallInt,
            "INT4" => Self::Int,
            "INT8" => Self::BigInt,
            "FLOAT4" => Self::Real,
            "FLOAT8" => Self::Double,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => Self::Text,
            "DATE" => Self::Date,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::TimestampTz,
            "JSON" | "JSONB" => Self::Json,
            _ => return None,
        };
        Some(kind)
    }
}

/// Convert a row into a JSON object
///
/// NULLs become `null`. Aggregates over NUMERIC columns should be cast to
/// `float8` in SQL; unsupported column types are reported as decode errors.
pub fn row_to_json(row: &PgRow) -> DatabaseResult<JsonRow> {
    let mut record = Map::with_capacity(row.len());

    for column in row.columns() {
        let type_name = column.type_info().name();
        let kind = ColumnKind::from_type_name(type_name).ok_or_else(|| {
            DatabaseError::Decode(format!(
                "unsupported type {} for column {}",
                type_name,
                column.name()
            ))
        })?;

        let idx = column.ordinal();
        let value = decode_column(row, idx, kind).map_err(DatabaseError::Query)?;
        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

fn decode_column(row: &PgRow, idx: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        ColumnKind::Bool => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
        ColumnKind::SmallInt => row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
        ColumnKind::Int => row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
        ColumnKind::BigInt => row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
        ColumnKind::Real => row.try_get::<Option<f32>, _>(idx)?.map(Value::from),
        ColumnKind::Double => row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
        ColumnKind::Text => row.try_get::<Option<String>, _>(idx)?.map(Value::from),
        ColumnKind::Date => row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|d| Value::from(d.to_string())),
        ColumnKind::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|t| Value::from(t.to_string())),
        ColumnKind::TimestampTz => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|t| Value::from(t.to_rfc3339())),
        ColumnKind::Json => row.try_get::<Option<Value>, _>(idx)?,
    };

    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_type_names() {
        assert_eq!(ColumnKind::from_type_name("INT4"), Some(ColumnKind::Int));
        assert_eq!(ColumnKind::from_type_name("FLOAT8"), Some(ColumnKind::Double));
        assert_eq!(ColumnKind::from_type_name("VARCHAR"), Some(ColumnKind::Text));
        assert_eq!(ColumnKind::from_type_name("BPCHAR"), Some(ColumnKind::Text));
        assert_eq!(ColumnKind::from_type_name("JSONB"), Some(ColumnKind::Json));
    }

    #[test]
    fn test_numeric_is_not_decoded() {
        // SUM() over integer or numeric columns yields NUMERIC; queries cast it.
        assert_eq!(ColumnKind::from_type_name("NUMERIC"), None);
        assert_eq!(ColumnKind::from_type_name("BYTEA"), None);
    }
}
