use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::data_source::DataSourceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data source error: {0}")]
    DataSource(String),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataSource(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Query(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            AppError::Internal(_) => (status, "Internal server error").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

impl From<DataSourceError> for AppError {
    fn from(value: DataSourceError) -> Self {
        AppError::DataSource(value.to_string())
    }
}

impl From<duckdb::Error> for AppError {
    fn from(value: duckdb::Error) -> Self {
        AppError::Query(value.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        AppError::Internal(value.to_string())
    }
}
