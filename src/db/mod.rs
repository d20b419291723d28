pub mod market_queries;
