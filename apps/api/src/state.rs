use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
}
