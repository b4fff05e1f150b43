pub mod health;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let index = Path::new(&state.config.template_dir).join("index.html");
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/ping", get(health::ping_handler))
        .route("/health", get(health::health_handler))
        // Oversized resumes are truncated by the validator, not refused here.
        .route(
            "/feedback",
            post(handlers::handle_feedback).layer(DefaultBodyLimit::disable()),
        )
        // Frontend assets
        .route_service("/", ServeFile::new(index))
        .nest_service("/static", static_dir)
        .with_state(state)
}
