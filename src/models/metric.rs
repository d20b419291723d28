use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricOp {
    Mean,
    Max,
    Min,
}

/// Result of an aggregation. `NotAvailable` means "no data", not a failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Available(f64),
    NotAvailable,
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Available(v) => Some(*v),
            MetricValue::NotAvailable => None,
        }
    }

    /// `N/A`, or the value with thousands separators and two decimals.
    pub fn display(&self, prefix: &str) -> String {
        match self {
            MetricValue::Available(v) => format!("{}{}", prefix, format_thousands(*v)),
            MetricValue::NotAvailable => "N/A".to_string(),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Available(v) => serializer.serialize_f64(*v),
            MetricValue::NotAvailable => serializer.serialize_none(),
        }
    }
}

/// A labelled summary figure as shown on the overview cards.
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
    pub display: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: MetricValue, prefix: &str) -> Self {
        Self {
            label: label.into(),
            display: value.display(prefix),
            value,
        }
    }
}

fn format_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Values that round to zero print unsigned.
    let negative = value < 0.0 && formatted.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if negative { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_available() {
        assert_eq!(MetricValue::NotAvailable.display("$"), "N/A");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(MetricValue::Available(84213.456).display("$"), "$84,213.46");
        assert_eq!(MetricValue::Available(999.0).display(""), "999.00");
        assert_eq!(MetricValue::Available(1234567.0).display(""), "1,234,567.00");
        assert_eq!(MetricValue::Available(-1500.5).display(""), "-1,500.50");
    }

    #[test]
    fn test_tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(MetricValue::Available(-0.001).display(""), "0.00");
        assert_eq!(MetricValue::Available(-0.5).display(""), "-0.50");
    }

    #[test]
    fn test_serializes_not_available_as_null() {
        let json = serde_json::to_value(Metric::new("Oil Avg", MetricValue::NotAvailable, "$")).unwrap();
        assert!(json["value"].is_null());
        assert_eq!(json["display"], "N/A");
    }
}
