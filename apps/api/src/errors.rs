use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;
use crate::screening::pipeline::PipelineState;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no API key supplied")]
    Missing,

    #[error("API key rejected: {0}")]
    Rejected(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Model service error while {}: {source}", .stage.as_str())]
    Service {
        stage: PipelineState,
        source: LlmError,
    },
}

impl AppError {
    /// Maps a model-call failure at `stage`. A rejected key is a credential
    /// problem, not a service outage.
    pub fn from_llm(stage: PipelineState, err: LlmError) -> Self {
        match err {
            LlmError::InvalidCredential(msg) => AppError::Credential(CredentialError::Rejected(msg)),
            source => AppError::Service { stage, source },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut stage = None;
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Credential(CredentialError::Missing) => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIAL_ERROR",
                "An API key is required".to_string(),
            ),
            AppError::Credential(CredentialError::Rejected(msg)) => {
                tracing::warn!("API key rejected: {msg}");
                (
                    StatusCode::UNAUTHORIZED,
                    "CREDENTIAL_ERROR",
                    "The API key was rejected by the model service".to_string(),
                )
            }
            AppError::Extraction(e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR", e.to_string())
            }
            AppError::Service { stage: s, source } => {
                tracing::error!("LLM error while {}: {source}", s.as_str());
                stage = Some(s.as_str());
                (
                    StatusCode::BAD_GATEWAY,
                    "SERVICE_ERROR",
                    "The model service failed to respond".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(stage) = stage {
            error["stage"] = json!(stage);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
