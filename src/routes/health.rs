use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    info!("GET /health - Health check");
    let entries = state.market.loader().cache().entries();
    let cache: Vec<Value> = entries
        .iter()
        .map(|(query, entry)| {
            json!({
                "query": query,
                "rows": entry.table.len(),
                "loaded_at": entry.loaded_at,
            })
        })
        .collect();
    Json(json!({
        "status": "ok",
        "cached_queries": entries.len(),
        "cache": cache,
    }))
}
