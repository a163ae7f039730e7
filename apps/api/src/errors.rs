use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::client::AnalysisError;
use crate::pdf::{RenderError, ValidationError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid upload: {0}")]
    Upload(#[from] ValidationError),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload(e) => {
                let status = match e {
                    ValidationError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                    ValidationError::WrongExtension | ValidationError::BadSignature => {
                        StatusCode::UNSUPPORTED_MEDIA_TYPE
                    }
                };
                (status, e.code(), e.to_string())
            }
            // Bodies over the router limit never reach PdfGate; report them the same way.
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                let e = ValidationError::TooLarge;
                (StatusCode::PAYLOAD_TOO_LARGE, e.code(), e.to_string())
            }
            AppError::Multipart(e) => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_MULTIPART",
                e.body_text(),
            ),
            AppError::Analysis(e) => match e {
                AnalysisError::EmptyJobDescription => {
                    (StatusCode::BAD_REQUEST, "EMPTY_JOB_DESCRIPTION", e.to_string())
                }
                AnalysisError::NoPages => (StatusCode::UNPROCESSABLE_ENTITY, "NO_PAGES", e.to_string()),
                AnalysisError::InsufficientText => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INSUFFICIENT_TEXT",
                    e.to_string(),
                ),
                AnalysisError::RemoteCall(inner) => {
                    tracing::error!("LLM error: {inner}");
                    (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string())
                }
            },
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PDF_PROCESSING_FAILED",
                    "Failed to process PDF. Please try another file.".to_string(),
                )
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
