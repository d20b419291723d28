use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::mysql::{MySqlColumn, MySqlRow};
use sqlx::{Column, Executor, MySqlPool, Row, Statement, TypeInfo};
use tracing::warn;

use crate::models::{ColumnKind, Table, Value};

pub const CRYPTOCURRENCIES: &str = "SELECT * FROM cryptocurrencies";
pub const HISTORICAL_PRICES: &str = "SELECT * FROM historical_prices";
pub const OIL_PRICES: &str = "SELECT * FROM oil_prices";
pub const STOCK_PRICES: &str = "SELECT * FROM stock_prices";

/// Runs an arbitrary read query and materializes it as a [`Table`],
/// decoding each cell from the column's MySQL type.
pub async fn fetch_table(pool: &MySqlPool, sql: &str) -> Result<Table, sqlx::Error> {
    let rows: Vec<MySqlRow> = sqlx::query(sql).fetch_all(pool).await?;

    let (columns, kinds) = match rows.first() {
        Some(first) => describe(first.columns()),
        None => {
            // No rows to read metadata from; ask the server for the statement shape.
            let statement = pool.prepare(sql).await?;
            describe(statement.columns())
        }
    };

    let mut table = Table::new(columns)
        .with_column_kinds(kinds)
        .map_err(sqlx::Error::Protocol)?;
    for row in &rows {
        let values = (0..row.columns().len())
            .map(|i| decode_cell(row, i))
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(values).map_err(sqlx::Error::Protocol)?;
    }
    Ok(table)
}

fn describe(columns: &[MySqlColumn]) -> (Vec<String>, Vec<Option<ColumnKind>>) {
    columns
        .iter()
        .map(|c| (c.name().to_string(), kind_for_type(c.type_info().name())))
        .unzip()
}

/// Column kind for a MySQL type name, `None` for types decoded as raw text.
pub(crate) fn kind_for_type(type_name: &str) -> Option<ColumnKind> {
    let type_name = type_name.to_ascii_uppercase();
    if type_name.ends_with("UNSIGNED") {
        return Some(ColumnKind::Int);
    }
    match type_name.as_str() {
        "BOOLEAN" => Some(ColumnKind::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Some(ColumnKind::Int),
        "FLOAT" | "DOUBLE" | "DECIMAL" => Some(ColumnKind::Float),
        "DATE" => Some(ColumnKind::Date),
        "DATETIME" | "TIMESTAMP" => Some(ColumnKind::Timestamp),
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "JSON" => {
            Some(ColumnKind::Text)
        }
        _ => None,
    }
}

fn decode_cell(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    let type_name = row.columns()[index].type_info().name().to_ascii_uppercase();

    let value = if type_name.ends_with("UNSIGNED") {
        row.try_get::<Option<u64>, _>(index)?.map(|v| match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Float(v as f64),
        })
    } else {
        match type_name.as_str() {
            "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                row.try_get::<Option<i64>, _>(index)?.map(Value::Int)
            }
            "FLOAT" => row
                .try_get::<Option<f32>, _>(index)?
                .map(|v| Value::Float(v as f64)),
            "DOUBLE" => row.try_get::<Option<f64>, _>(index)?.map(Value::Float),
            "DECIMAL" => row
                .try_get::<Option<BigDecimal>, _>(index)?
                .map(|d| d.to_f64().map(Value::Float).unwrap_or(Value::Null)),
            "DATE" => row.try_get::<Option<NaiveDate>, _>(index)?.map(Value::Date),
            "DATETIME" => row
                .try_get::<Option<NaiveDateTime>, _>(index)?
                .map(Value::Timestamp),
            "TIMESTAMP" => row
                .try_get::<Option<DateTime<Utc>>, _>(index)?
                .map(|ts| Value::Timestamp(ts.naive_utc())),
            _ => decode_text(row, index, &type_name),
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

fn decode_text(row: &MySqlRow, index: usize, type_name: &str) -> Option<Value> {
    match row.try_get::<Option<String>, _>(index) {
        Ok(v) => v.map(Value::Text),
        Err(_) => match row.try_get_unchecked::<Option<Vec<u8>>, _>(index) {
            Ok(bytes) => bytes.map(|b| Value::Text(String::from_utf8_lossy(&b).into_owned())),
            Err(e) => {
                warn!("Unsupported MySQL column type {} at index {}: {}", type_name, index, e);
                None
            }
        },
    }
}
