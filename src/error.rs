use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::pass_issuer::PassIssuanceError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Issuance error: {0}")]
    Issuance(PassIssuanceError),
}

impl From<PassIssuanceError> for AppError {
    fn from(err: PassIssuanceError) -> Self {
        match err {
            PassIssuanceError::InvalidInput(e) => AppError::Validation(e.to_string()),
            other => AppError::Issuance(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Issuance(e) => {
                tracing::error!(error = %e, cause = ?e, "Pass issuance failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
