use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, error};

use crate::config::DatabaseConfig;
use crate::db;
use crate::external::data_source::{DataSource, DataSourceError};
use crate::models::Table;

/// MySQL-backed [`DataSource`]. The pool connects lazily, so an unreachable
/// server only fails the requests that need it.
#[derive(Clone)]
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DataSourceError> {
        let pool = config
            .pool_options()
            .connect_lazy_with(config.connect_options()?);
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DataSource for MySqlSource {
    async fn fetch_table(&self, query: &str) -> Result<Table, DataSourceError> {
        debug!("Fetching from MySQL: {}", query.chars().take(80).collect::<String>());
        db::market_queries::fetch_table(&self.pool, query)
            .await
            .map_err(|e| {
                error!("MySQL query failed: {}", e);
                DataSourceError::from(e)
            })
    }
}
