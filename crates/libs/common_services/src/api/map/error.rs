use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("Invalid map query: {0}")]
    InvalidParams(String),
}

fn log_error(error: &MapError) {
    match error {
        MapError::Database(e) => error!("Map query failed: {}", e),
        MapError::InvalidParams(message) => warn!("Rejected map query: {}", message),
    }
}

impl IntoResponse for MapError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_string(),
            ),
            Self::InvalidParams(message) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid map query: {message}"),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for MapError {
    fn from(err: DbError) -> Self {
        let DbError::Sqlx(sql_err) = err;
        Self::Database(sql_err)
    }
}
