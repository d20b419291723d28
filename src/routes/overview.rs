use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{DateRangeParams, OverviewResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_overview))
}

async fn get_overview(
    Query(params): Query<DateRangeParams>,
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    info!("GET /api/overview - start={:?} end={:?}", params.start, params.end);
    state.market.overview(&params).await
        .map(Json)
        .map_err(|e| {
            error!("Failed to build overview: {}", e);
            e
        })
}
