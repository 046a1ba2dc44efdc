use analyzer::error::AnalyzerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Maps a store error onto an HTTP status. Only caller mistakes are echoed back;
/// anything else is logged and reported generically.
fn database_response(db_err: DbError) -> (StatusCode, String) {
    match db_err {
        DbError::NotFound(_) => (StatusCode::NOT_FOUND, db_err.to_string()),
        DbError::InvalidSaleDate { .. } | DbError::Validation(_) => (StatusCode::BAD_REQUEST, db_err.to_string()),
        DbError::ViewCountOverflow(_) => (StatusCode::CONFLICT, db_err.to_string()),
        other => {
            tracing::error!(error = ?other, "Database error.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal database error occurred".to_string(),
            )
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => database_response(db_err),
            AppError::Analyzer(AnalyzerError::Database(db_err)) => database_response(db_err),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
