// Resume feedback endpoint.
// Implements: payload validation and sanitization, prompt construction, the POST handler.
// All provider calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod validation;
