mod config;
mod errors;
mod feedback;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on an unparseable PORT)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume reviewer v{}", env!("CARGO_PKG_VERSION"));

    if config.groq_api_key.is_none() {
        error!("GROQ_API_KEY is not set; every /feedback call will fail with 503 until it is.");
        error!("Set the environment variable and restart, e.g. export GROQ_API_KEY='YOUR_KEY_HERE'");
    }

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone(), config.groq_api_url.clone())?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        config.groq_api_url
    );

    let state = AppState {
        llm,
        config: config.clone(),
    };

    // The hosted frontend may call from another origin, so CORS stays open.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
