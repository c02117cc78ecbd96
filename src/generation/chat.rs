//! OpenAI-compatible `/chat/completions` client.
//!
//! Works against any backend that speaks the chat completions wire format
//! (OpenAI, Groq, local gateways). One HTTP request per call, no retries.

use serde::{Deserialize, Serialize};

use super::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::GenerationConfig;

/// Error code backends use for retired models.
const DECOMMISSIONED_CODE: &str = "model_decommissioned";

pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        tracing::debug!(endpoint = %endpoint, "chat completions client ready");

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }
}

impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(model = request.model, max_tokens = request.max_tokens, "sending chat completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "chat completion request failed"))?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = classify_error(status.as_u16(), request.model, &text);
            tracing::warn!(status = status.as_u16(), error = %err, "chat completion rejected");
            return Err(err);
        }

        extract_content(&text)
    }
}

/// Map a non-success response body onto a [`GenerationError`].
fn classify_error(status: u16, model: &str, body: &str) -> GenerationError {
    let (message, code) = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.code),
        Err(_) => (body.trim().to_string(), None),
    };

    let decommissioned = code.as_deref() == Some(DECOMMISSIONED_CODE)
        || message.contains(DECOMMISSIONED_CODE)
        || body.contains(DECOMMISSIONED_CODE);

    if decommissioned {
        GenerationError::Decommissioned {
            model: model.to_string(),
            message,
        }
    } else {
        GenerationError::Status { status, message }
    }
}

/// Pull the first choice's text out of a success body.
fn extract_content(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(content)
    }
}
