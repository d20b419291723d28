#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crossmarket_backend::db::market_queries;
use crossmarket_backend::external::data_source::{DataSource, DataSourceError};
use crossmarket_backend::models::{Table, Value};
use crossmarket_backend::services::data_loader::DataLoader;
use crossmarket_backend::services::market_service::MarketService;

/// Serves fixed tables keyed by query text and counts round trips.
pub struct StaticSource {
    tables: HashMap<&'static str, Table>,
    pub calls: AtomicUsize,
    pub offline: bool,
}

impl StaticSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch_table(&self, query: &str) -> Result<Table, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(DataSourceError::Connection(
                "Can't connect to MySQL server on 'localhost:3306'".into(),
            ));
        }
        self.tables
            .get(query)
            .cloned()
            .ok_or_else(|| DataSourceError::Query(format!("Table for '{}' doesn't exist", query)))
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::from_rows(columns.iter().map(|c| c.to_string()).collect(), rows).unwrap()
}

/// Bitcoin on Jan 1-3, ethereum on Jan 2, oil on Jan 2-3, S&P on Jan 1,
/// NIFTY on Jan 2.
pub fn fixture_tables() -> HashMap<&'static str, Table> {
    let mut tables = HashMap::new();
    tables.insert(
        market_queries::CRYPTOCURRENCIES,
        table(
            &["id", "name", "market_cap", "current_price"],
            vec![
                vec!["bitcoin".into(), "Bitcoin".into(), 1_300_000_000_000i64.into(), 67000.0.into()],
                vec!["ethereum".into(), "Ethereum".into(), 400_000_000_000i64.into(), 3300.0.into()],
                vec!["tether".into(), "Tether".into(), 110_000_000_000i64.into(), 1.0.into()],
                vec!["dogecoin".into(), "Dogecoin".into(), 20_000_000_000i64.into(), 0.14.into()],
            ],
        ),
    );
    tables.insert(
        market_queries::HISTORICAL_PRICES,
        table(
            &["coin_id", "date", "price_usd"],
            vec![
                vec!["bitcoin".into(), "2024-01-03".into(), 120.0.into()],
                vec!["bitcoin".into(), "2024-01-01".into(), 100.0.into()],
                vec!["bitcoin".into(), "2024-01-02".into(), 110.0.into()],
                vec!["ethereum".into(), "2024-01-02".into(), 50.0.into()],
            ],
        ),
    );
    tables.insert(
        market_queries::OIL_PRICES,
        table(
            &["Date", "Price"],
            vec![
                vec![day(2).into(), 70.0.into()],
                vec![day(3).into(), 72.0.into()],
            ],
        ),
    );
    tables.insert(
        market_queries::STOCK_PRICES,
        table(
            &["Date", "Ticker", "Close", "Volume"],
            vec![
                vec![day(1).into(), "^GSPC".into(), 4700.0.into(), 1000i64.into()],
                vec![day(2).into(), "^NSEI".into(), 21000.0.into(), 500i64.into()],
            ],
        ),
    );
    tables
}

pub fn source(offline: bool) -> Arc<StaticSource> {
    Arc::new(StaticSource {
        tables: fixture_tables(),
        calls: AtomicUsize::new(0),
        offline,
    })
}

pub fn source_with(tables: HashMap<&'static str, Table>) -> Arc<StaticSource> {
    Arc::new(StaticSource {
        tables,
        calls: AtomicUsize::new(0),
        offline: false,
    })
}

pub fn service(source: Arc<StaticSource>) -> MarketService {
    MarketService::new(DataLoader::new(source))
}
