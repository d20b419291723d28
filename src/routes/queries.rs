use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{QueryRunResponse, SavedQueryInfo};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_queries))
        .route("/:id", get(run_query))
        .route("/:id/csv", get(run_query_csv))
}

async fn list_queries(State(state): State<AppState>) -> Json<Vec<SavedQueryInfo>> {
    info!("GET /api/queries - Listing saved queries");
    Json(state.market.catalog())
}

async fn run_query(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<QueryRunResponse>, AppError> {
    info!("GET /api/queries/{} - Running saved query", id);
    state.market.run_catalog_query(id).await
        .map(Json)
        .map_err(|e| {
            error!("Saved query {} failed: {}", id, e);
            e
        })
}

async fn run_query_csv(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("GET /api/queries/{}/csv - Exporting saved query", id);
    let response = state.market.run_catalog_query(id).await?;
    let body = response.result.to_csv()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"query_{}.csv\"", id),
            ),
        ],
        body,
    ))
}
