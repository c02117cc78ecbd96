//! Remote text generation.
//!
//! The journal depends only on the [`TextGenerator`] capability: turn a prompt and a
//! system instruction into text. [`create_generator`] builds the configured backend;
//! tests supply their own implementation.

pub mod chat;

use std::future::Future;

use thiserror::Error;

use crate::config::GenerationConfig;

/// A single generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Backend model identifier.
    pub model: &'a str,
    pub prompt: &'a str,
    pub system: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Why a generation call failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend no longer serves this model. The only failure that is retried.
    #[error("model {model} is decommissioned: {message}")]
    Decommissioned { model: String, message: String },

    #[error("generation backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("generation backend returned no content")]
    EmptyResponse,

    #[error("invalid response from generation backend: {0}")]
    InvalidResponse(String),

    #[error("no API key configured (set DREAMLOG_API_KEY or generation.api_key)")]
    MissingApiKey,

    #[error("text generation is disabled")]
    Disabled,

    #[error("unknown generation provider: {0}. Supported: openai_compatible, disabled")]
    UnknownProvider(String),
}

impl GenerationError {
    pub fn is_decommissioned(&self) -> bool {
        matches!(self, Self::Decommissioned { .. })
    }
}

/// Capability for generating text from a prompt.
///
/// Implementations perform one remote call per invocation and never retry;
/// fallback handling lives with the caller.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// The generator selected by configuration.
pub enum Generator {
    Chat(chat::ChatCompletionsClient),
    /// Fails every call, so every recorded dream is stored as a degraded entry.
    Disabled,
}

impl TextGenerator for Generator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        match self {
            Self::Chat(client) => client.generate(request).await,
            Self::Disabled => Err(GenerationError::Disabled),
        }
    }
}

/// Create a generator from config.
///
/// Returns [`GenerationError::MissingApiKey`] for a remote provider without a key.
pub fn create_generator(config: &GenerationConfig) -> Result<Generator, GenerationError> {
    match config.provider.as_str() {
        "openai_compatible" => {
            let client = chat::ChatCompletionsClient::new(config)?;
            Ok(Generator::Chat(client))
        }
        "disabled" => Ok(Generator::Disabled),
        other => Err(GenerationError::UnknownProvider(other.to_string())),
    }
}
