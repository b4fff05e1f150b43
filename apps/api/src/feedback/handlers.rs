//! Axum route handler for the feedback endpoint.

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::feedback::prompts::build_feedback_prompt;
use crate::feedback::validation::parse_feedback_request;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// POST /feedback
///
/// Gate order: credential → payload validation → provider call.
/// A missing credential is reported before the body is even looked at.
/// Body read failures surface as `InvalidPayload` so the caller always gets JSON.
pub async fn handle_feedback(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    state.llm.ensure_configured()?;

    let body = body.map_err(|rejection| {
        warn!("Failed to read feedback request body: {rejection}");
        AppError::no_payload()
    })?;
    let request = parse_feedback_request(&body)?;
    info!(
        job_role = %request.job_role,
        resume_chars = request.resume_text.chars().count(),
        job_desc_chars = request.job_desc.chars().count(),
        "Requesting resume feedback"
    );

    let prompt = build_feedback_prompt(&request);
    let feedback = state.llm.complete(&prompt).await?;

    Ok(Json(FeedbackResponse { feedback }))
}
