use async_trait::async_trait;
use thiserror::Error;

use crate::models::Table;

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for DataSourceError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)
            | sqlx::Error::Protocol(_) => DataSourceError::Connection(value.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DataSourceError::Decode(value.to_string())
            }
            other => DataSourceError::Query(other.to_string()),
        }
    }
}

/// Read-only access to the external relational store.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Runs `query` and materializes every row.
    async fn fetch_table(&self, query: &str) -> Result<Table, DataSourceError>;
}
