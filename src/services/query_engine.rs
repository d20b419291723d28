//! Embedded analytical SQL over in-memory tables.
//!
//! Every call opens a private in-memory DuckDB database, registers the
//! bindings as relations, runs one read statement and converts the result
//! back into a [`Table`]. Nothing outlives the call, so bound tables are never
//! mutated and concurrent calls never see each other's relations.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Duration, Local, NaiveDate};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{params_from_iter, Connection, ToSql};
use regex::{Captures, Regex};
use tracing::{debug, error};

use crate::errors::AppError;
use crate::models::{ColumnKind, Table, Value};
use crate::services::sql_guard;

/// Named tables exposed to a query as relations.
#[derive(Debug, Clone, Default)]
pub struct TableBindings {
    tables: BTreeMap<String, Arc<Table>>,
}

impl TableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relation. Names are case-insensitive, as in SQL.
    pub fn bind(mut self, name: &str, table: Arc<Table>) -> Self {
        self.tables.insert(name.to_lowercase(), table);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.get(&name.to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Arc<Table>)> {
        self.tables.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Date,
    Timestamp,
    Varchar,
}

impl From<ColumnKind> for ColumnType {
    fn from(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Bool => ColumnType::Boolean,
            ColumnKind::Int => ColumnType::BigInt,
            ColumnKind::Float => ColumnType::Double,
            ColumnKind::Text => ColumnType::Varchar,
            ColumnKind::Date => ColumnType::Date,
            ColumnKind::Timestamp => ColumnType::Timestamp,
        }
    }
}

impl ColumnType {
    fn sql(self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Varchar => "VARCHAR",
        }
    }

    fn of(value: &Value) -> Option<ColumnType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ColumnType::Boolean),
            Value::Int(_) => Some(ColumnType::BigInt),
            Value::Float(_) => Some(ColumnType::Double),
            Value::Text(_) => Some(ColumnType::Varchar),
            Value::Date(_) => Some(ColumnType::Date),
            Value::Timestamp(_) => Some(ColumnType::Timestamp),
        }
    }

    /// Type for a column with no values and no declared kind. Date columns
    /// keep their type so that join keys still line up on empty tables.
    fn untyped(column: &str) -> ColumnType {
        if column.eq_ignore_ascii_case("date") {
            ColumnType::Date
        } else {
            ColumnType::Varchar
        }
    }

    fn widen(self, other: ColumnType) -> ColumnType {
        use ColumnType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (BigInt, Double) | (Double, BigInt) => Double,
            (Date, Timestamp) | (Timestamp, Date) => Timestamp,
            _ => Varchar,
        }
    }

    /// Placeholder for one inserted cell; temporal values travel as text.
    fn placeholder(self) -> &'static str {
        match self {
            ColumnType::Date => "CAST(? AS DATE)",
            ColumnType::Timestamp => "CAST(? AS TIMESTAMP)",
            _ => "?",
        }
    }

    fn bind_value(self, value: &Value) -> DuckValue {
        match (self, value) {
            (_, Value::Null) => DuckValue::Null,
            (ColumnType::BigInt, Value::Int(v)) => DuckValue::BigInt(*v),
            (ColumnType::Double, v) => v
                .as_f64()
                .filter(|f| f.is_finite())
                .map(DuckValue::Double)
                .unwrap_or(DuckValue::Null),
            (ColumnType::Boolean, Value::Bool(b)) => DuckValue::Boolean(*b),
            (ColumnType::Timestamp, Value::Date(d)) => {
                DuckValue::Text(format!("{} 00:00:00", d.format("%Y-%m-%d")))
            }
            (_, other) => DuckValue::Text(other.to_string()),
        }
    }
}

/// Runs one read statement over `bindings`.
///
/// Malformed SQL, write statements, unknown relations and unknown columns all
/// surface as [`AppError::Query`] carrying the engine's diagnostic.
pub fn run_query(sql: &str, bindings: &TableBindings) -> Result<Table, AppError> {
    let sql = sql_guard::normalize_sql(sql)?;
    sql_guard::ensure_read_only(sql)?;

    let sql = pin_current_date(sql, Local::now().date_naive());

    let connection = Connection::open_in_memory().map_err(engine_unavailable)?;
    for (name, table) in bindings.iter() {
        register(&connection, name, table)?;
    }
    debug!(
        "Running query over [{}]",
        bindings.names().collect::<Vec<_>>().join(", ")
    );

    let (columns, rows) = execute_select(&connection, &sql).map_err(|e| {
        error!("Query failed: {}", e);
        AppError::Query(e.to_string())
    })?;
    Table::from_rows(columns, rows).map_err(AppError::Query)
}

fn engine_unavailable(e: duckdb::Error) -> AppError {
    error!("Failed to open query engine: {}", e);
    AppError::Internal(format!("failed to open query engine: {}", e))
}

fn current_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|(?i:\bcurrent_date\b(?:\s*\(\s*\))?)"#)
            .expect("valid current_date regex")
    })
}

/// Replaces `current_date` with a literal for `today`, outside quoted text.
///
/// The engine derives `current_date` from a time-zone aware timestamp, which
/// needs the ICU extension; the bundled build ships without it.
fn pin_current_date(sql: &str, today: NaiveDate) -> Cow<'_, str> {
    current_date_pattern().replace_all(sql, |caps: &Captures| {
        let matched = &caps[0];
        if matched.starts_with('\'') || matched.starts_with('"') {
            matched.to_string()
        } else {
            format!("DATE '{}'", today.format("%Y-%m-%d"))
        }
    })
}

/// [`run_query`] on the blocking pool, for async callers.
pub async fn run_query_async(sql: String, bindings: TableBindings) -> Result<Table, AppError> {
    tokio::task::spawn_blocking(move || run_query(&sql, &bindings)).await?
}

fn register(connection: &Connection, name: &str, table: &Table) -> Result<(), AppError> {
    if table.columns().is_empty() {
        return Err(AppError::Query(format!("relation '{}' has no columns", name)));
    }

    let types: Vec<ColumnType> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            table
                .rows()
                .iter()
                .filter_map(|row| ColumnType::of(&row[i]))
                .reduce(ColumnType::widen)
                .or_else(|| table.column_kind(i).map(ColumnType::from))
                .unwrap_or_else(|| ColumnType::untyped(column))
        })
        .collect();

    let definition = table
        .columns()
        .iter()
        .zip(&types)
        .map(|(column, ty)| format!("{} {}", quote_ident(column), ty.sql()))
        .collect::<Vec<_>>()
        .join(", ");
    connection.execute_batch(&format!("CREATE TABLE {} ({});", quote_ident(name), definition))?;

    if table.is_empty() {
        return Ok(());
    }

    let placeholders = types.iter().map(|t| t.placeholder()).collect::<Vec<_>>().join(", ");
    let insert = format!("INSERT INTO {} VALUES ({})", quote_ident(name), placeholders);

    connection.execute_batch("BEGIN TRANSACTION")?;
    let result = (|| -> Result<(), duckdb::Error> {
        let mut statement = connection.prepare(&insert)?;
        for row in table.rows() {
            let values = row.iter().zip(&types).map(|(v, ty)| ty.bind_value(v));
            statement.execute(params_from_iter(values))?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => {
            connection.execute_batch("COMMIT")?;
            debug!("Registered relation {} ({} rows)", name, table.len());
            Ok(())
        }
        Err(e) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(AppError::Query(format!("failed to register relation '{}': {}", name, e)))
        }
    }
}

fn execute_select(
    connection: &Connection,
    sql: &str,
) -> Result<(Vec<String>, Vec<Vec<Value>>), duckdb::Error> {
    let mut statement = connection.prepare(sql)?;
    // Column metadata is only available once the statement has run.
    let _ = statement.query([] as [&dyn ToSql; 0])?;

    let column_count = statement.column_count();
    let mut columns = Vec::with_capacity(column_count);
    for index in 0..column_count {
        columns.push(statement.column_name(index)?.to_string());
    }

    let mut output = Vec::new();
    let mut rows = statement.query([] as [&dyn ToSql; 0])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value: DuckValue = row.get(index)?;
            values.push(from_duck(value));
        }
        output.push(values);
    }
    Ok((columns, output))
}

fn from_duck(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(v) => Value::Bool(v),
        DuckValue::TinyInt(v) => Value::Int(v.into()),
        DuckValue::SmallInt(v) => Value::Int(v.into()),
        DuckValue::Int(v) => Value::Int(v.into()),
        DuckValue::BigInt(v) => Value::Int(v),
        DuckValue::UTinyInt(v) => Value::Int(v.into()),
        DuckValue::USmallInt(v) => Value::Int(v.into()),
        DuckValue::UInt(v) => Value::Int(v.into()),
        DuckValue::UBigInt(v) => i64::try_from(v)
            .map(Value::Int)
            .unwrap_or(Value::Float(v as f64)),
        DuckValue::HugeInt(v) => i64::try_from(v)
            .map(Value::Int)
            .unwrap_or(Value::Float(v as f64)),
        DuckValue::Float(v) => finite_or_null(v as f64),
        DuckValue::Double(v) => finite_or_null(v),
        DuckValue::Decimal(v) => v
            .to_string()
            .parse::<f64>()
            .map(finite_or_null)
            .unwrap_or(Value::Null),
        DuckValue::Text(v) => Value::Text(v),
        DuckValue::Blob(v) => Value::Text(String::from_utf8_lossy(&v).into_owned()),
        DuckValue::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(days.into())))
            .map(Value::Date)
            .unwrap_or(Value::Null),
        DuckValue::Timestamp(unit, v) => {
            let micros = match unit {
                TimeUnit::Second => v.saturating_mul(1_000_000),
                TimeUnit::Millisecond => v.saturating_mul(1_000),
                TimeUnit::Microsecond => v,
                TimeUnit::Nanosecond => v / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map(|ts| Value::Timestamp(ts.naive_utc()))
                .unwrap_or(Value::Null)
        }
        other => Value::Text(format!("{:?}", other)),
    }
}

/// Division by zero in floating point yields inf/NaN; those read back as null.
fn finite_or_null(v: f64) -> Value {
    if v.is_finite() {
        Value::Float(v)
    } else {
        Value::Null
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
