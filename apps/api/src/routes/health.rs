use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /ping
/// Liveness probe used by the hosting platform.
pub async fn ping_handler() -> &'static str {
    "pong"
}

/// GET /health
/// Returns a simple status object with service version and whether the provider key is loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-reviewer",
        "provider_configured": state.llm.is_configured()
    }))
}
