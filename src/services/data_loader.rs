use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::external::data_source::DataSource;
use crate::models::Table;
use crate::services::query_cache::QueryCache;
use crate::services::schema_normalizer::SchemaNormalizer;
use crate::services::sql_guard;

/// Loads tables from the external store, memoized per exact query text.
///
/// Tables are normalized as they arrive, so the cache only ever holds
/// normalized snapshots.
#[derive(Clone)]
pub struct DataLoader {
    source: Arc<dyn DataSource>,
    normalizer: SchemaNormalizer,
    cache: QueryCache,
}

impl DataLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            normalizer: SchemaNormalizer::default(),
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Returns the cached snapshot for `query`, fetching it on first use.
    pub async fn load(&self, query: &str) -> Result<Arc<Table>, AppError> {
        if let Some(table) = self.cache.get(query) {
            debug!("Cache hit for query: {}", preview(query));
            return Ok(table);
        }
        self.fetch_and_store(query).await
    }

    /// Fetches `query` again and swaps the cached snapshot. On failure the
    /// previous snapshot stays in place.
    pub async fn reload(&self, query: &str) -> Result<Arc<Table>, AppError> {
        self.fetch_and_store(query).await
    }

    pub fn invalidate(&self, query: &str) -> bool {
        self.cache.invalidate(query)
    }

    pub fn reset(&self) {
        let dropped = self.cache.len();
        self.cache.clear();
        info!("Query cache reset ({} entries dropped)", dropped);
    }

    async fn fetch_and_store(&self, query: &str) -> Result<Arc<Table>, AppError> {
        sql_guard::ensure_read_only(query)?;

        let table = self.source.fetch_table(query).await.map_err(|e| {
            error!("Failed to load query {}: {}", preview(query), e);
            AppError::from(e)
        })?;
        let table = self.normalizer.normalize(&table).map_err(|e| {
            error!("Rejected result of query {}: {}", preview(query), e);
            e
        })?;

        info!("Loaded {} rows for query: {}", table.len(), preview(query));
        let table = Arc::new(table);
        self.cache.insert(query, table.clone());
        Ok(table)
    }
}

fn preview(query: &str) -> String {
    let flat = query.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.chars().take(60).collect()
}
