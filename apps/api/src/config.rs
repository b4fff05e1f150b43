use anyhow::{Context, Result};

pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_PORT: u16 = 5000;

/// Application configuration loaded from environment variables.
/// Only `PORT` can fail startup; a missing `GROQ_API_KEY` is reported per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub port: u16,
    pub static_dir: String,
    pub template_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_api_url: optional_env("GROQ_API_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string()),
            port: parse_port(optional_env("PORT").as_deref())?,
            static_dir: optional_env("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            template_dir: optional_env("TEMPLATE_DIR").unwrap_or_else(|| "template".to_string()),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Blank values are treated the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(raw: Option<&str>) -> Result<u16> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse::<u16>()
            .with_context(|| format!("PORT must be a valid port number, got '{value}'")),
    }
}
