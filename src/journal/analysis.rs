//! Analysis functions: prompt templates around the [`TextGenerator`].
//!
//! Every call goes through [`Analyzer::complete`], which retries once on the
//! fallback model when the backend reports the current model as decommissioned.
//! After that swap the analyzer keeps using the fallback.

use std::sync::{Mutex, PoisonError};

use crate::generation::{GenerationError, GenerationRequest, TextGenerator};

use super::types::{MAX_TAGS, MOOD_VOCABULARY};

const ANALYSIS_SYSTEM: &str = "You are a professional dream analyst.";
const TAGS_SYSTEM: &str = "You extract tags from dream descriptions.";
const MOOD_SYSTEM: &str = "You classify dream moods using single words.";

/// Sampling settings for one prompt kind.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
}

pub const ANALYSIS_SAMPLING: Sampling = Sampling { max_tokens: 500, temperature: 0.7 };
pub const TAGS_SAMPLING: Sampling = Sampling { max_tokens: 50, temperature: 0.3 };
pub const MOOD_SAMPLING: Sampling = Sampling { max_tokens: 10, temperature: 0.2 };

pub struct Analyzer<G> {
    generator: G,
    model: Mutex<String>,
    fallback_model: String,
}

impl<G: TextGenerator> Analyzer<G> {
    pub fn new(generator: G, model: impl Into<String>, fallback_model: impl Into<String>) -> Self {
        Self {
            generator,
            model: Mutex::new(model.into()),
            fallback_model: fallback_model.into(),
        }
    }

    /// The model the next call will use.
    pub fn current_model(&self) -> String {
        self.model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Run one prompt, swapping to the fallback model at most once.
    pub async fn complete(
        &self,
        prompt: &str,
        system: &str,
        sampling: Sampling,
    ) -> Result<String, GenerationError> {
        let model = self.current_model();
        let result = self.generate_with(&model, prompt, system, sampling).await;

        match result {
            Err(e) if e.is_decommissioned() && model != self.fallback_model => {
                tracing::warn!(
                    model = %model,
                    fallback = %self.fallback_model,
                    "model unavailable, falling back"
                );
                *self.model.lock().unwrap_or_else(PoisonError::into_inner) =
                    self.fallback_model.clone();
                self.generate_with(&self.fallback_model, prompt, system, sampling)
                    .await
            }
            other => other,
        }
    }

    async fn generate_with(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        sampling: Sampling,
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest {
            model,
            prompt,
            system,
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
        };
        self.generator
            .generate(&request)
            .await
            .inspect_err(|e| tracing::warn!(model, error = %e, "generation failed"))
    }

    /// Free-text psychological reading of the dream.
    pub async fn analyze(&self, dream: &str) -> Result<String, GenerationError> {
        let prompt = format!(
            "Analyze this dream and provide psychological insights (3-5 sentences).\n\
             Focus on recurring symbols, emotions, and potential real-life connections.\n\n\
             Dream: {dream}\n\nAnalysis:"
        );
        self.complete(&prompt, ANALYSIS_SYSTEM, ANALYSIS_SAMPLING).await
    }

    /// Up to [`MAX_TAGS`] lowercase tags.
    pub async fn extract_tags(&self, dream: &str) -> Result<Vec<String>, GenerationError> {
        let prompt = format!(
            "Extract 3-5 most relevant tags from this dream description.\n\
             Return only a comma-separated list of lowercase tags.\n\n\
             Dream: {dream}\n\nTags:"
        );
        let raw = self.complete(&prompt, TAGS_SYSTEM, TAGS_SAMPLING).await?;
        Ok(parse_tags(&raw))
    }

    /// One-word mood. Not checked against [`MOOD_VOCABULARY`].
    pub async fn detect_mood(&self, dream: &str) -> Result<String, GenerationError> {
        let prompt = format!(
            "Classify the mood of this dream using one word from:\n\
             {}.\n\n\
             Dream: {dream}\n\nMood:",
            mood_choices()
        );
        let raw = self.complete(&prompt, MOOD_SYSTEM, MOOD_SAMPLING).await?;
        Ok(normalize_mood(&raw))
    }
}

/// Split a comma-separated reply into at most [`MAX_TAGS`] distinct lowercase tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(|t| t.trim().to_lowercase()) {
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    tags
}

/// The vocabulary as prose: `"happy, anxious, ..., neutral, or other"`.
fn mood_choices() -> String {
    match MOOD_VOCABULARY.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
        _ => MOOD_VOCABULARY.join(", "),
    }
}

pub fn normalize_mood(raw: &str) -> String {
    raw.trim().to_lowercase()
}
