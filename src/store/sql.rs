//! SQL text and bind values derived from a one-row `DataFrame`.

use crate::store::error::StoreError;
use polars::prelude::*;

/// Quotes a PostgreSQL identifier, doubling any embedded quote.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// The column types a table can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    BigInt,
    Double,
    Boolean,
    Text,
}

impl SqlType {
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            SqlType::BigInt
        } else if dtype.is_float() {
            SqlType::Double
        } else if *dtype == DataType::Boolean {
            SqlType::Boolean
        } else {
            SqlType::Text
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE PRECISION",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Text => "TEXT",
        }
    }
}

pub fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

pub fn create_table_sql(schema: &str, table: &str, frame: &DataFrame) -> String {
    let columns = frame
        .get_columns()
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name()), SqlType::of(c.dtype()).as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_table(schema, table),
        columns
    )
}

/// Builds the insert for one row whose cells are `values`, in column order.
///
/// Null cells are written as a literal, untyped `NULL` so that Postgres accepts them for
/// any column type; only non-null cells get a `$n` placeholder. Bind the non-null
/// values, in order, to the returned statement.
pub fn insert_sql(schema: &str, table: &str, frame: &DataFrame, values: &[SqlValue]) -> String {
    let names = frame
        .get_columns()
        .iter()
        .map(|c| quote_ident(c.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut next = 0;
    let placeholders = values
        .iter()
        .map(|value| {
            if value.is_null() {
                "NULL".to_string()
            } else {
                next += 1;
                format!("${next}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified_table(schema, table),
        names,
        placeholders
    )
}

pub fn date_chunk_sql(schema: &str, table: &str, date_column: &str) -> String {
    let date = quote_ident(date_column);
    format!(
        "SELECT {date}::text FROM {} ORDER BY {date} LIMIT $1 OFFSET $2",
        qualified_table(schema, table)
    )
}

/// A typed bind value for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Text(Option<String>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Int(v) => v.is_none(),
            SqlValue::Float(v) => v.is_none(),
            SqlValue::Bool(v) => v.is_none(),
            SqlValue::Text(v) => v.is_none(),
        }
    }
}

/// Reads the single row of `frame` as bind values, in column order.
///
/// # Errors
///
/// [`StoreError::RowCount`] unless the frame has exactly one row.
pub fn row_values(frame: &DataFrame) -> Result<Vec<SqlValue>, StoreError> {
    if frame.height() != 1 {
        return Err(StoreError::RowCount(frame.height()));
    }

    frame
        .get_columns()
        .iter()
        .map(|column| cell_value(column))
        .collect()
}

fn cell_value(column: &Column) -> Result<SqlValue, StoreError> {
    let value = match SqlType::of(column.dtype()) {
        SqlType::BigInt => SqlValue::Int(column.cast(&DataType::Int64)?.i64()?.get(0)),
        SqlType::Double => SqlValue::Float(column.cast(&DataType::Float64)?.f64()?.get(0)),
        SqlType::Boolean => SqlValue::Bool(column.bool()?.get(0)),
        SqlType::Text => SqlValue::Text(
            column
                .cast(&DataType::String)?
                .str()?
                .get(0)
                .map(str::to_string),
        ),
    };
    Ok(value)
}
