use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::models::Table;

/// A materialized result kept for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: Arc<Table>,
    pub loaded_at: DateTime<Utc>,
}

/// Thread-safe cache of query results keyed by the exact query text.
///
/// Entries are immutable snapshots: a refresh swaps the `Arc` in one insert,
/// so readers holding the previous snapshot are never affected.
#[derive(Clone, Default)]
pub struct QueryCache {
    cache: Arc<DashMap<String, CachedTable>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<Arc<Table>> {
        self.cache.get(query).map(|entry| entry.table.clone())
    }

    /// Every cached query with its snapshot, ordered by query text.
    pub fn entries(&self) -> Vec<(String, CachedTable)> {
        let mut entries: Vec<_> = self
            .cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Stores (or replaces) the snapshot for `query`.
    pub fn insert(&self, query: &str, table: Arc<Table>) {
        self.cache.insert(
            query.to_string(),
            CachedTable {
                table,
                loaded_at: Utc::now(),
            },
        );
    }

    pub fn invalidate(&self, query: &str) -> bool {
        self.cache.remove(query).is_some()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
