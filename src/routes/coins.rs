use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{CoinOption, CoinTrendResponse, DateRangeParams, COIN_OPTIONS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coins))
        .route("/:coin_id/trend", get(get_trend))
}

async fn list_coins() -> Json<Vec<CoinOption>> {
    Json(COIN_OPTIONS.to_vec())
}

async fn get_trend(
    Path(coin_id): Path<String>,
    Query(params): Query<DateRangeParams>,
    State(state): State<AppState>,
) -> Result<Json<CoinTrendResponse>, AppError> {
    info!("GET /api/coins/{}/trend - start={:?} end={:?}", coin_id, params.start, params.end);
    state.market.coin_trend(&coin_id, &params).await
        .map(Json)
        .map_err(|e| {
            error!("Failed to build trend for {}: {}", coin_id, e);
            e
        })
}
