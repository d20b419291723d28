use crate::errors::AppError;
use crate::models::{MetricOp, MetricValue, Table};

/// Mean, max or min over the numeric cells of `column`.
///
/// Nulls, NaN and non-numeric cells are skipped. An empty table, or a column
/// with nothing numeric left, yields [`MetricValue::NotAvailable`].
pub fn aggregate(table: &Table, column: &str, op: MetricOp) -> Result<MetricValue, AppError> {
    if table.is_empty() {
        return Ok(MetricValue::NotAvailable);
    }

    let values = table
        .column(column)
        .ok_or_else(|| AppError::Schema(format!("unknown column '{}'", column)))?
        .filter_map(|v| v.as_f64())
        .filter(|v| v.is_finite());

    let (count, sum, min, max) = values.fold(
        (0usize, 0.0_f64, f64::INFINITY, f64::NEG_INFINITY),
        |(n, sum, lo, hi), v| (n + 1, sum + v, lo.min(v), hi.max(v)),
    );

    if count == 0 {
        return Ok(MetricValue::NotAvailable);
    }

    Ok(MetricValue::Available(match op {
        MetricOp::Mean => sum / count as f64,
        MetricOp::Max => max,
        MetricOp::Min => min,
    }))
}
