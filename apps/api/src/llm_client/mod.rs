/// LLM Client: the single point of entry for all model calls in the reviewer.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Callers depend on the `ModelInvoker` trait; `LlmClient` is the production backend,
/// built once in `main` and shared through `AppState`.
///
/// Model: claude-sonnet-4-5 (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::document::DocumentPayload;
use crate::review::request::ModelRequest;

pub mod prompts;

#[cfg(test)]
pub mod fake;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sends one request to a model and returns its raw text.
///
/// No retries and no interpretation: failures are returned as-is and the caller
/// decides on a fallback.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, request: &ModelRequest<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Document { source: DocumentSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DocumentSource<'a> {
    Base64 { media_type: &'a str, data: String },
    Text { media_type: &'a str, data: &'a str },
}

impl<'a> ContentPart<'a> {
    fn document(payload: &'a DocumentPayload) -> Self {
        let source = match payload {
            DocumentPayload::Binary { data, mime_type } => DocumentSource::Base64 {
                media_type: mime_type,
                data: base64::engine::general_purpose::STANDARD.encode(data),
            },
            DocumentPayload::Text(text) => DocumentSource::Text {
                media_type: "text/plain",
                data: text,
            },
        };
        ContentPart::Document { source }
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API. Cheap to clone; construct once per process.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            timeout,
        })
    }

    /// Makes a single call to the Claude API, returning the full response object.
    pub async fn call(&self, request: &ModelRequest<'_>) -> Result<LlmResponse, LlmError> {
        let request_body = build_request_body(request);

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await.map_err(|e| self.classify(e))?;

        debug!(
            "LLM call succeeded ({}): input_tokens={}, output_tokens={}",
            request.goal, llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }

    fn classify(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(error)
        }
    }
}

#[async_trait]
impl ModelInvoker for LlmClient {
    async fn invoke(&self, request: &ModelRequest<'_>) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// The document goes first, then the instruction that refers to it.
fn build_request_body<'a>(request: &'a ModelRequest<'_>) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        temperature: request.temperature,
        system: &request.system,
        messages: vec![AnthropicMessage {
            role: "user",
            content: vec![
                ContentPart::document(request.document),
                ContentPart::Text {
                    text: &request.prompt,
                },
            ],
        }],
    }
}
