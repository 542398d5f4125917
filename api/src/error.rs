use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use roster_core::validation::ValidationError;
use serde::Serialize;

/// Failure of the backing player store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("KeyDB error: {0}")]
    KeyDb(#[from] redis::RedisError),
    #[error("corrupt player record {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Reasons a player request can fail. Each maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("player {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Store(err) => {
                error!("Player store failure: {}", err);
                "Internal server error".to_string()
            }
            other => {
                warn!("Request rejected: {}", other);
                other.to_string()
            }
        };

        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}
