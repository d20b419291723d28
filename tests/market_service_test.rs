mod common;

use std::sync::Arc;

use crossmarket_backend::db::market_queries;
use crossmarket_backend::errors::AppError;
use crossmarket_backend::models::{ColumnKind, DateRange, DateRangeParams, MetricValue, Table, Value};

use common::{day, fixture_tables, service, source, source_with};

#[tokio::test]
async fn test_overview_defaults_to_stock_span() {
    let market = service(source(false));

    let overview = market.overview(&DateRangeParams::default()).await.unwrap();

    assert_eq!(overview.range, Some(DateRange::new(day(1), day(2))));
    let values: Vec<MetricValue> = overview.metrics.iter().map(|m| m.value).collect();
    assert_eq!(
        values,
        vec![
            MetricValue::Available(105.0),
            MetricValue::Available(70.0),
            MetricValue::Available(4700.0),
            MetricValue::Available(21000.0),
        ]
    );
    assert_eq!(overview.metrics[1].display, "$70.00");
    assert_eq!(overview.metrics[2].display, "4,700.00");
}

#[tokio::test]
async fn test_overview_snapshot_merges_markets_by_date() {
    let market = service(source(false));

    let overview = market.overview(&DateRangeParams::default()).await.unwrap();
    assert!(overview.snapshot_error.is_none());
    let snapshot = overview.snapshot.unwrap();

    assert_eq!(snapshot.columns(), ["Date", "Bitcoin", "Crude_Oil", "S&P 500", "Nifty 50"]);
    assert_eq!(snapshot.len(), 2);
    // Newest first
    assert_eq!(snapshot.value(0, "Date"), Some(&Value::Date(day(2))));
    assert_eq!(snapshot.value(0, "Bitcoin"), Some(&Value::Float(110.0)));
    assert_eq!(snapshot.value(0, "Crude_Oil"), Some(&Value::Float(70.0)));
    assert_eq!(snapshot.value(0, "S&P 500"), Some(&Value::Null));
    assert_eq!(snapshot.value(0, "Nifty 50"), Some(&Value::Float(21000.0)));
    assert_eq!(snapshot.value(1, "S&P 500"), Some(&Value::Float(4700.0)));
    assert_eq!(snapshot.value(1, "Crude_Oil"), Some(&Value::Null));
}

#[tokio::test]
async fn test_overview_with_no_matching_rows_reports_not_available() {
    let market = service(source(false));
    let params = DateRangeParams {
        start: Some(day(20)),
        end: Some(day(25)),
    };

    let overview = market.overview(&params).await.unwrap();

    assert!(overview.metrics.iter().all(|m| m.value == MetricValue::NotAvailable));
    assert!(overview.metrics.iter().all(|m| m.display == "N/A"));
    assert_eq!(overview.snapshot.map(|t| t.len()), Some(0));
}

#[tokio::test]
async fn test_tables_are_fetched_once_across_requests() {
    let src = source(false);
    let market = service(src.clone());

    market.overview(&DateRangeParams::default()).await.unwrap();
    market.overview(&DateRangeParams::default()).await.unwrap();
    market.coin_trend("bitcoin", &DateRangeParams::default()).await.unwrap();

    assert_eq!(src.calls(), 3);
    assert_eq!(market.loader().cache().len(), 3);

    market.reset_cache();
    market.overview(&DateRangeParams::default()).await.unwrap();
    assert_eq!(src.calls(), 6);
}

#[tokio::test]
async fn test_offline_source_is_data_source_error() {
    let src = source(true);
    let market = service(src.clone());

    let err = market.overview(&DateRangeParams::default()).await.unwrap_err();

    assert!(matches!(err, AppError::DataSource(ref msg) if msg.contains("Can't connect")));
    assert!(market.loader().cache().is_empty());
}

#[tokio::test]
async fn test_coin_trend_over_full_history() {
    let market = service(source(false));

    let trend = market.coin_trend("bitcoin", &DateRangeParams::default()).await.unwrap();

    assert_eq!(trend.range, DateRange::new(day(1), day(3)));
    assert_eq!(trend.average_price, MetricValue::Available(110.0));
    assert_eq!(trend.max_price, MetricValue::Available(120.0));
    let dates: Vec<_> = trend.series.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![day(1), day(2), day(3)]);
    assert_eq!(trend.daily.columns(), ["Date", "Coin", "Price"]);
    assert_eq!(trend.daily.value(0, "Date"), Some(&Value::Date(day(3))));
}

#[tokio::test]
async fn test_coin_trend_respects_range() {
    let market = service(source(false));
    let params = DateRangeParams {
        start: Some(day(2)),
        end: None,
    };

    let trend = market.coin_trend("bitcoin", &params).await.unwrap();

    assert_eq!(trend.range, DateRange::new(day(2), day(3)));
    assert_eq!(trend.series.len(), 2);
    assert_eq!(trend.average_price, MetricValue::Available(115.0));
}

#[tokio::test]
async fn test_coin_trend_unknown_coin_is_not_found() {
    let market = service(source(false));

    let err = market.coin_trend("dogecoin", &DateRangeParams::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = market.coin_trend("  ", &DateRangeParams::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_catalog_query_runs_over_full_dataset() {
    let market = service(source(false));

    let response = market.run_catalog_query(1).await.unwrap();

    assert_eq!(response.row_count, 3);
    assert_eq!(response.result.columns(), ["name", "market_cap", "current_price"]);
    let names: Vec<_> = response
        .result
        .column("name")
        .unwrap()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(names, vec!["Bitcoin", "Ethereum", "Tether"]);
}

#[tokio::test]
async fn test_catalog_query_on_unknown_relation_is_query_error() {
    let market = service(source(false));

    let err = market.run_catalog_query(20).await.unwrap_err();
    assert!(matches!(err, AppError::Query(ref msg) if msg.contains("df_stock")));

    let err = market.run_catalog_query(99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_market_data_is_normalized() {
    let market = service(source(false));

    let data = market.market_data().await.unwrap();

    assert_eq!(data.oil_prices.columns(), ["date", "price"]);
    assert_eq!(data.historical_prices.value(1, "date"), Some(&Value::Date(day(1))));
    let cached = market
        .loader()
        .cache()
        .get(market_queries::HISTORICAL_PRICES)
        .unwrap();
    assert!(Arc::ptr_eq(&cached, &data.historical_prices));
}

#[tokio::test]
async fn test_failed_query_leaves_cached_tables_alone() {
    let src = source(false);
    let market = service(src.clone());
    market.run_catalog_query(1).await.unwrap();
    let before = market.loader().cache().entries();
    assert_eq!(before.len(), 4);

    let err = market.run_catalog_query(20).await.unwrap_err();
    assert!(matches!(err, AppError::Query(_)));

    let after = market.loader().cache().entries();
    assert_eq!(after.len(), before.len());
    for ((query, old), (same_query, new)) in before.iter().zip(&after) {
        assert_eq!(query, same_query);
        assert!(Arc::ptr_eq(&old.table, &new.table), "{} was replaced", query);
    }
    assert_eq!(src.calls(), 4);
}

#[tokio::test]
async fn test_catalog_query_over_empty_declared_table() {
    let mut tables = fixture_tables();
    let empty_oil = Table::new(vec!["Date".into(), "Price".into()])
        .with_column_kinds(vec![Some(ColumnKind::Date), Some(ColumnKind::Float)])
        .unwrap();
    tables.insert(market_queries::OIL_PRICES, empty_oil);
    let market = service(source_with(tables));

    let response = market.run_catalog_query(12).await.unwrap();

    assert_eq!(response.row_count, 0);
    assert_eq!(response.result.columns(), ["oil_year", "avg_price"]);
}
