use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::review::intake::IntakeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Model failures never show up here: the pipeline turns them into stage defaults.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Intake(e) => {
                tracing::warn!("Submission rejected at intake: {e}");
                let status = match e {
                    IntakeError::TooLarge { .. } | IntakeError::RequestTooLarge { .. } => {
                        StatusCode::PAYLOAD_TOO_LARGE
                    }
                    IntakeError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    IntakeError::MissingFile | IntakeError::EmptyFile => StatusCode::BAD_REQUEST,
                    IntakeError::NotAPdf | IntakeError::Extraction(_) | IntakeError::NoText => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, "INTAKE_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
