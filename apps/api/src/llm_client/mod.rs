/// LLM Client: the single point of entry for all Groq API calls in the reviewer.
///
/// No other module talks to the provider directly. One call per request, no retries:
/// a failed call is reported to the caller immediately.
///
/// Model: llama-3.1-8b-instant (hardcoded, not configurable)
use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The model used for every feedback call.
pub const MODEL: &str = "llama-3.1-8b-instant";
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.7;
/// Hard bound on the whole upstream call, connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Groq API key is not configured")]
    MissingCredential,

    #[error("Groq API request timed out")]
    Timeout,

    #[error("could not connect to Groq API endpoint: {0}")]
    Unreachable(String),

    #[error("Groq API error {status}")]
    Api { status: u16, body: String },

    #[error("no choices returned from Groq")]
    NoChoices(Value),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else if e.is_connect() {
            LlmError::Unreachable(e.to_string())
        } else {
            LlmError::Unexpected(anyhow::Error::new(e).context("Groq API transport failure"))
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// The single LLM client shared by all handlers.
/// The credential is read once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, endpoint: String) -> anyhow::Result<Self> {
        Self::with_timeout(api_key, endpoint, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: Option<String>,
        endpoint: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fails fast when no credential was provided at startup.
    pub fn ensure_configured(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingCredential)
    }

    /// Sends `prompt` as a single user message and returns the first choice's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.ensure_configured()?;

        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let result = self.send(api_key, &request_body).await;
        // Unexpected failures are logged with their full chain at the HTTP boundary.
        if let Err(e) = &result {
            if !matches!(e, LlmError::Unexpected(_)) {
                warn!("Groq call failed: {e}");
            }
        }
        result
    }

    async fn send(
        &self,
        api_key: &str,
        request_body: &ChatCompletionRequest<'_>,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        let status = response.status();
        info!("Groq API call completed. Status: {}", status.as_u16());

        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value =
            serde_json::from_str(&body).context("Groq API returned a body that is not JSON")?;

        extract_feedback(value)
    }
}

/// Pulls `choices[0].message.content` out of a successful completion body.
fn extract_feedback(value: Value) -> Result<String, LlmError> {
    let has_choices = value
        .get("choices")
        .and_then(Value::as_array)
        .is_some_and(|choices| !choices.is_empty());
    if !has_choices {
        return Err(LlmError::NoChoices(value));
    }

    let parsed: ChatCompletionResponse = serde_json::from_value(value)
        .context("Groq API response has an unexpected shape")?;

    let first = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Groq API response lost its first choice"))?;

    debug!("Groq returned {} chars of feedback", first.message.content.len());
    Ok(first.message.content)
}
