//! Backend for a cross-market analysis dashboard: crypto, oil and equity index
//! prices loaded from MySQL, cached per query, normalized, filtered by date and
//! queried through an embedded analytical SQL engine.

pub mod app;
pub mod config;
pub mod db;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
