use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::recovery::RecoveryFailure;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Score-bearing failures (`Recovery`, `MissingField`, `MalformedField`)
/// always propagate — a fabricated default score would corrupt the
/// aggregation invariants. Coaching text, by contrast, falls back
/// deterministically inside the normalizers and never reaches here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transcription produced no usable text")]
    EmptyTranscription,

    #[error("Structured output recovery failed: {0}")]
    Recovery(#[from] RecoveryFailure),

    #[error("Model output missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Malformed field: {0}")]
    MalformedField(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Audio processing error: {0}")]
    Audio(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::EmptyTranscription => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_TRANSCRIPTION",
                "Transcription produced no usable text".to_string(),
            ),
            AppError::Recovery(e) => {
                tracing::error!("JSON recovery failed; raw tail: {}", e.raw_tail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RECOVERY_ERROR",
                    "Model output could not be parsed".to_string(),
                )
            }
            AppError::MissingField(field) => {
                tracing::error!("Model output missing required field '{field}'");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MISSING_FIELD",
                    format!("Model output missing required field '{field}'"),
                )
            }
            AppError::MalformedField(msg) => {
                (StatusCode::BAD_REQUEST, "MALFORMED_FIELD", msg.clone())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Audio(msg) => {
                tracing::error!("Audio error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUDIO_ERROR",
                    "An audio processing error occurred".to_string(),
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
