use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bank::BankError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Storage(String),
}

impl From<BankError> for AppError {
    fn from(err: BankError) -> Self {
        match err {
            BankError::NotFound(_) | BankError::NotMember { .. } => {
                AppError::NotFound(err.to_string())
            }
            BankError::AlreadyRedeemed(_) => AppError::Conflict(err.to_string()),
            other => {
                error!("Storage failure: {other}");
                AppError::Storage(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
