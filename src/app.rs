use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{cache, coins, health, overview, queries};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/overview", overview::router())
        .nest("/api/queries", queries::router())
        .nest("/api/coins", coins::router())
        .nest("/api/cache", cache::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
