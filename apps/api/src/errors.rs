use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

pub const NO_PAYLOAD_MESSAGE: &str = "No JSON payload provided";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": ..., "details"?: ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Server Configuration Error: GROQ_API_KEY is not set on the backend.")]
    Configuration,

    #[error("{0}")]
    InvalidPayload(String),

    #[error("Resume text and job role are required")]
    MissingRequiredField,

    #[error("Groq API request timed out.")]
    UpstreamTimeout,

    #[error("Could not connect to Groq API endpoint.")]
    UpstreamUnreachable,

    #[error("Groq API error {status}")]
    UpstreamError { status: u16, body: String },

    #[error("No choices returned from Groq")]
    UpstreamMalformedResponse(Value),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn no_payload() -> Self {
        AppError::InvalidPayload(NO_PAYLOAD_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration | AppError::UpstreamUnreachable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::InvalidPayload(_) | AppError::MissingRequiredField => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::UpstreamError { .. }
            | AppError::UpstreamMalformedResponse(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::UpstreamError { body, .. } => Some(Value::String(body.clone())),
            AppError::UpstreamMalformedResponse(parsed) => Some(parsed.clone()),
            _ => None,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingCredential => AppError::Configuration,
            LlmError::Timeout => AppError::UpstreamTimeout,
            LlmError::Unreachable(_) => AppError::UpstreamUnreachable,
            LlmError::Api { status, body } => AppError::UpstreamError { status, body },
            LlmError::NoChoices(parsed) => AppError::UpstreamMalformedResponse(parsed),
            LlmError::Unexpected(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Configuration => tracing::error!("{self}"),
            // Debug output includes the backtrace when RUST_BACKTRACE is set.
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }

        let mut body = json!({ "error": self.to_string() });
        if let Some(details) = self.details() {
            body["details"] = details;
        }

        (self.status(), Json(body)).into_response()
    }
}
