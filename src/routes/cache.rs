use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/reset", post(reset_cache))
}

async fn reset_cache(State(state): State<AppState>) -> StatusCode {
    info!("POST /api/cache/reset - Dropping cached tables");
    state.market.reset_cache();
    StatusCode::NO_CONTENT
}
