use std::sync::Arc;

use tracing::{info, warn};

use crate::db::market_queries;
use crate::errors::AppError;
use crate::models::{
    ChartPoint, CoinTrendResponse, DateRangeParams, MarketData, Metric, MetricOp,
    OverviewResponse, QueryRunResponse, SavedQueryInfo,
};
use crate::services::data_loader::DataLoader;
use crate::services::metric_service::aggregate;
use crate::services::query_catalog;
use crate::services::query_engine::{self, TableBindings};
use crate::services::range_filter::{date_extent, filter_by_date, filter_eq};

pub const BITCOIN: &str = "bitcoin";
pub const SP500_TICKER: &str = "^GSPC";
pub const NIFTY_TICKER: &str = "^NSEI";

const SNAPSHOT_SQL: &str = r#"
    SELECT
        CAST(COALESCE(btc.date, oil.date, sp.date, nfy.date) AS DATE) AS "Date",
        btc.price_usd AS Bitcoin,
        oil.price AS Crude_Oil,
        sp.close AS "S&P 500",
        nfy.close AS "Nifty 50"
    FROM (SELECT date, price_usd FROM f_crypto WHERE coin_id = 'bitcoin') btc
    FULL OUTER JOIN f_oil oil ON btc.date = oil.date
    FULL OUTER JOIN (SELECT date, close FROM f_stock WHERE ticker = '^GSPC') sp
        ON COALESCE(btc.date, oil.date) = sp.date
    FULL OUTER JOIN (SELECT date, close FROM f_stock WHERE ticker = '^NSEI') nfy
        ON COALESCE(btc.date, oil.date, sp.date) = nfy.date
    ORDER BY "Date" DESC
"#;

const DAILY_PRICE_SQL: &str = r#"
    SELECT
        date AS "Date",
        coin_id AS "Coin",
        price_usd AS "Price"
    FROM analysis_df
    ORDER BY date DESC
"#;

/// The three dashboard modes on top of the loader, filters, engine and
/// aggregator.
#[derive(Clone)]
pub struct MarketService {
    loader: DataLoader,
}

impl MarketService {
    pub fn new(loader: DataLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub async fn market_data(&self) -> Result<MarketData, AppError> {
        let (cryptocurrencies, historical_prices, oil_prices, stock_prices) = futures::try_join!(
            self.loader.load(market_queries::CRYPTOCURRENCIES),
            self.loader.load(market_queries::HISTORICAL_PRICES),
            self.loader.load(market_queries::OIL_PRICES),
            self.loader.load(market_queries::STOCK_PRICES),
        )?;
        Ok(MarketData {
            cryptocurrencies,
            historical_prices,
            oil_prices,
            stock_prices,
        })
    }

    /// Summary metrics plus the merged daily snapshot for a date range
    /// (default: the span of the stock data).
    pub async fn overview(&self, params: &DateRangeParams) -> Result<OverviewResponse, AppError> {
        let (crypto, oil, stock) = futures::try_join!(
            self.loader.load(market_queries::HISTORICAL_PRICES),
            self.loader.load(market_queries::OIL_PRICES),
            self.loader.load(market_queries::STOCK_PRICES),
        )?;

        let range = params.resolve(date_extent(&stock, "date"));
        let (f_crypto, f_oil, f_stock) = match range {
            Some(r) => (
                filter_by_date(&crypto, "date", r.start, r.end)?,
                filter_by_date(&oil, "date", r.start, r.end)?,
                filter_by_date(&stock, "date", r.start, r.end)?,
            ),
            None => ((*crypto).clone(), (*oil).clone(), (*stock).clone()),
        };
        info!(
            "Overview {:?}: {} crypto, {} oil, {} stock rows",
            range,
            f_crypto.len(),
            f_oil.len(),
            f_stock.len()
        );

        let btc = filter_eq(&f_crypto, "coin_id", BITCOIN)?;
        let sp500 = filter_eq(&f_stock, "ticker", SP500_TICKER)?;
        let nifty = filter_eq(&f_stock, "ticker", NIFTY_TICKER)?;
        let metrics = vec![
            Metric::new("Bitcoin (Avg)", aggregate(&btc, "price_usd", MetricOp::Mean)?, ""),
            Metric::new("Oil Avg", aggregate(&f_oil, "price", MetricOp::Mean)?, "$"),
            Metric::new("S&P 500 Avg", aggregate(&sp500, "close", MetricOp::Mean)?, ""),
            Metric::new("NIFTY Avg", aggregate(&nifty, "close", MetricOp::Mean)?, ""),
        ];

        let bindings = TableBindings::new()
            .bind("f_crypto", Arc::new(f_crypto))
            .bind("f_oil", Arc::new(f_oil))
            .bind("f_stock", Arc::new(f_stock));
        let (snapshot, snapshot_error) =
            match query_engine::run_query_async(SNAPSHOT_SQL.to_string(), bindings).await {
                Ok(table) => (Some(table), None),
                Err(e) => {
                    warn!("Snapshot failed: {}", e);
                    (None, Some(e.to_string()))
                }
            };

        Ok(OverviewResponse {
            range,
            metrics,
            snapshot,
            snapshot_error,
        })
    }

    /// Price history of one coin within a date range (default: all of it).
    pub async fn coin_trend(
        &self,
        coin_id: &str,
        params: &DateRangeParams,
    ) -> Result<CoinTrendResponse, AppError> {
        if coin_id.trim().is_empty() {
            return Err(AppError::Validation("coin id must not be empty".to_string()));
        }
        let history = self.loader.load(market_queries::HISTORICAL_PRICES).await?;
        let coin = filter_eq(&history, "coin_id", coin_id)?;

        let range = params
            .resolve(date_extent(&coin, "date"))
            .filter(|_| !coin.is_empty())
            .ok_or_else(|| AppError::NotFound(format!("No price history for coin '{}'", coin_id)))?;

        let analysis = filter_by_date(&coin, "date", range.start, range.end)?;
        let average_price = aggregate(&analysis, "price_usd", MetricOp::Mean)?;
        let max_price = aggregate(&analysis, "price_usd", MetricOp::Max)?;

        let mut series: Vec<ChartPoint> = analysis
            .rows()
            .iter()
            .filter_map(|row| {
                let date = row[analysis.column_index("date")?].as_date()?;
                let price = analysis
                    .column_index("price_usd")
                    .and_then(|i| row[i].as_f64());
                Some(ChartPoint { date, price })
            })
            .collect();
        series.sort_by_key(|p| p.date);

        let bindings = TableBindings::new().bind("analysis_df", Arc::new(analysis));
        let daily = query_engine::run_query_async(DAILY_PRICE_SQL.to_string(), bindings).await?;

        info!("Trend for {} over {:?}: {} days", coin_id, range, series.len());
        Ok(CoinTrendResponse {
            coin_id: coin_id.to_string(),
            range,
            average_price,
            max_price,
            daily,
            series,
        })
    }

    pub fn catalog(&self) -> Vec<SavedQueryInfo> {
        query_catalog::all().iter().map(|q| q.info()).collect()
    }

    /// Runs one predefined query over the full dataset.
    pub async fn run_catalog_query(&self, id: u32) -> Result<QueryRunResponse, AppError> {
        let query = query_catalog::find(id)
            .ok_or_else(|| AppError::NotFound(format!("No saved query with id {}", id)))?;

        let data = self.market_data().await?;
        let bindings = TableBindings::new()
            .bind("cryptocurrencies", data.cryptocurrencies)
            .bind("historical_prices", data.historical_prices)
            .bind("oil_prices", data.oil_prices)
            .bind("stock_prices", data.stock_prices);

        let result = query_engine::run_query_async(query.sql.to_string(), bindings).await?;
        info!("Saved query {} returned {} rows", id, result.len());
        Ok(QueryRunResponse {
            id: query.id,
            title: query.title,
            row_count: result.len(),
            result,
        })
    }

    pub fn reset_cache(&self) {
        self.loader.reset();
    }
}
