use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{DateRange, Table, Value};

/// Rows whose `column` falls within `[start, end]`, compared by calendar day.
///
/// An inverted range or no matching rows yields an empty table. The column
/// must hold dates (run the schema normalizer first); null dates never match.
pub fn filter_by_date(
    table: &Table,
    column: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Table, AppError> {
    let Some(index) = table.column_index(column) else {
        if table.is_empty() {
            return Ok(table.clone());
        }
        return Err(AppError::Schema(format!("unknown date column '{}'", column)));
    };

    if let Some(bad) = table
        .rows()
        .iter()
        .map(|row| &row[index])
        .find(|v| !v.is_null() && v.as_date().is_none())
    {
        return Err(AppError::Schema(format!(
            "column '{}' holds non-date value {:?}",
            column, bad
        )));
    }

    let range = DateRange::new(start, end);
    Ok(table.retain_rows(|row| row[index].as_date().is_some_and(|d| range.contains(d))))
}

/// Rows whose text `column` equals `key` exactly.
pub fn filter_eq(table: &Table, column: &str, key: &str) -> Result<Table, AppError> {
    let Some(index) = table.column_index(column) else {
        if table.is_empty() {
            return Ok(table.clone());
        }
        return Err(AppError::Schema(format!("unknown column '{}'", column)));
    };
    Ok(table.retain_rows(|row| row[index].as_str() == Some(key)))
}

/// Earliest and latest date in `column`, used as the default selection.
pub fn date_extent(table: &Table, column: &str) -> Option<DateRange> {
    let mut dates = table.column(column)?.filter_map(Value::as_date);
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange::new(min, max))
}
