use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::AppError;
use crate::models::{ColumnKind, Table, Value};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Lower-cases column names and coerces date columns to [`Value::Date`].
#[derive(Debug, Clone)]
pub struct SchemaNormalizer {
    date_columns: Vec<String>,
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new(["date"])
    }
}

impl SchemaNormalizer {
    pub fn new<I, S>(date_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            date_columns: date_columns
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn normalize(&self, table: &Table) -> Result<Table, AppError> {
        let columns: Vec<String> = table.columns().iter().map(|c| c.to_lowercase()).collect();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(AppError::Schema(format!(
                    "column '{}' appears more than once after lower-casing",
                    column
                )));
            }
        }

        let date_indexes: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, name)| self.date_columns.contains(name))
            .map(|(i, _)| i)
            .collect();

        let mut rows = Vec::with_capacity(table.len());
        for (row_index, row) in table.rows().iter().enumerate() {
            let mut row = row.clone();
            for &i in &date_indexes {
                let coerced = coerce_date(&row[i]).ok_or_else(|| {
                    AppError::Schema(format!(
                        "column '{}' row {}: cannot parse {:?} as a date",
                        columns[i], row_index, row[i]
                    ))
                })?;
                row[i] = coerced;
            }
            rows.push(row);
        }

        // Date columns now hold dates whatever the source declared.
        let kinds = table
            .column_kinds()
            .iter()
            .enumerate()
            .map(|(i, kind)| match kind {
                Some(_) if date_indexes.contains(&i) => Some(ColumnKind::Date),
                other => *other,
            })
            .collect();

        Table::from_rows(columns, rows)
            .and_then(|t| t.with_column_kinds(kinds))
            .map_err(AppError::Schema)
    }
}

fn coerce_date(value: &Value) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Null),
        Value::Date(d) => Some(Value::Date(*d)),
        Value::Timestamp(ts) => Some(Value::Date(ts.date())),
        Value::Text(s) => parse_date(s.trim()).map(Value::Date),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .map(|ts| ts.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|ts| ts.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn oil_raw() -> Table {
        Table::from_rows(
            vec!["Date".into(), "Price".into()],
            vec![
                vec!["2020-03-02".into(), Value::Float(46.75)],
                vec![
                    Value::Timestamp(d(2020, 3, 3).and_hms_opt(15, 0, 0).unwrap()),
                    Value::Float(47.18),
                ],
                vec![Value::Null, Value::Float(1.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lowercases_and_parses_dates() {
        let table = SchemaNormalizer::default().normalize(&oil_raw()).unwrap();

        assert_eq!(table.columns(), &["date".to_string(), "price".to_string()]);
        assert_eq!(table.value(0, "date"), Some(&Value::Date(d(2020, 3, 2))));
        assert_eq!(table.value(1, "date"), Some(&Value::Date(d(2020, 3, 3))));
        assert_eq!(table.value(2, "date"), Some(&Value::Null));
        assert_eq!(table.value(0, "price"), Some(&Value::Float(46.75)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = SchemaNormalizer::default();
        let once = normalizer.normalize(&oil_raw()).unwrap();
        let twice = normalizer.normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_accepts_other_text_layouts() {
        for text in ["2025/04/01", "2025-04-01 00:00:00", "2025-04-01T08:30:00.5", "2025-04-01T08:30:00Z"] {
            assert_eq!(parse_date(text), Some(d(2025, 4, 1)), "{}", text);
        }
    }

    #[test]
    fn test_unparseable_date_fails_whole_table() {
        let raw = Table::from_rows(
            vec!["date".into()],
            vec![vec!["2025-01-01".into()], vec!["yesterday".into()]],
        )
        .unwrap();

        let err = SchemaNormalizer::default().normalize(&raw).unwrap_err();
        assert!(matches!(err, AppError::Schema(ref msg) if msg.contains("yesterday")));
    }

    #[test]
    fn test_numeric_date_is_rejected() {
        let raw = Table::from_rows(vec!["date".into()], vec![vec![Value::Int(20250101)]]).unwrap();
        assert!(SchemaNormalizer::default().normalize(&raw).is_err());
    }

    #[test]
    fn test_case_collision_is_schema_error() {
        let raw = Table::new(vec!["Close".into(), "close".into()]);
        assert!(matches!(
            SchemaNormalizer::default().normalize(&raw),
            Err(AppError::Schema(_))
        ));
    }

    #[test]
    fn test_declared_kinds_are_kept() {
        let raw = oil_raw()
            .with_column_kinds(vec![Some(ColumnKind::Text), Some(ColumnKind::Float)])
            .unwrap();
        let table = SchemaNormalizer::default().normalize(&raw).unwrap();

        assert_eq!(table.column_kind(0), Some(ColumnKind::Date));
        assert_eq!(table.column_kind(1), Some(ColumnKind::Float));
        assert_eq!(SchemaNormalizer::default().normalize(&table).unwrap(), table);
    }

    #[test]
    fn test_tables_without_date_column_pass_through() {
        let raw = Table::from_rows(
            vec!["Name".into(), "Market_Cap".into()],
            vec![vec!["Bitcoin".into(), Value::Int(1_000)]],
        )
        .unwrap();
        let table = SchemaNormalizer::default().normalize(&raw).unwrap();
        assert_eq!(table.columns(), &["name".to_string(), "market_cap".to_string()]);
    }
}
