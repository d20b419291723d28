pub mod data_loader;
pub mod market_service;
pub mod metric_service;
pub mod query_cache;
pub mod query_catalog;
pub mod query_engine;
pub mod range_filter;
pub mod schema_normalizer;
pub mod sql_guard;
