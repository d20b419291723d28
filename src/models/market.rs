use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Metric, MetricValue, Table};

/// Inclusive day range selected by the analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Optional `?start=&end=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRangeParams {
    /// Missing bounds fall back to the given default range.
    pub fn resolve(&self, default: Option<DateRange>) -> Option<DateRange> {
        match (self.start, self.end, default) {
            (Some(start), Some(end), _) => Some(DateRange::new(start, end)),
            (start, end, Some(d)) => Some(DateRange::new(start.unwrap_or(d.start), end.unwrap_or(d.end))),
            (Some(start), None, None) => Some(DateRange::new(start, start)),
            (None, Some(end), None) => Some(DateRange::new(end, end)),
            (None, None, None) => None,
        }
    }
}

/// The four base relations, normalized.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub cryptocurrencies: std::sync::Arc<Table>,
    pub historical_prices: std::sync::Arc<Table>,
    pub oil_prices: std::sync::Arc<Table>,
    pub stock_prices: std::sync::Arc<Table>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
    pub range: Option<DateRange>,
    pub metrics: Vec<Metric>,
    pub snapshot: Option<Table>,
    pub snapshot_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinOption {
    pub id: &'static str,
    pub name: &'static str,
}

pub const COIN_OPTIONS: [CoinOption; 3] = [
    CoinOption { id: "bitcoin", name: "Bitcoin" },
    CoinOption { id: "ethereum", name: "Ethereum" },
    CoinOption { id: "tether", name: "Tether" },
];

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinTrendResponse {
    pub coin_id: String,
    pub range: DateRange,
    pub average_price: MetricValue,
    pub max_price: MetricValue,
    pub daily: Table,
    pub series: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedQueryInfo {
    pub id: u32,
    pub title: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryRunResponse {
    pub id: u32,
    pub title: &'static str,
    pub row_count: usize,
    pub result: Table,
}
