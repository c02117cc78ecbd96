#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use dreamlog::generation::{GenerationError, GenerationRequest, TextGenerator};
use dreamlog::journal::{Analyzer, Journal, JournalEntry, JournalStore};
use tempfile::TempDir;

pub const PRIMARY_MODEL: &str = "primary-model";
pub const FALLBACK_MODEL: &str = "fallback-model";

/// A request as the fake generator saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text generator that replays scripted replies in order.
///
/// Once the script is exhausted every call fails with HTTP 503. Requests for a
/// retired model fail as decommissioned without consuming a reply.
#[derive(Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    retired: HashSet<String>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl FakeGenerator {
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Every call fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn retire(mut self, model: &str) -> Self {
        self.retired.insert(model.to_string());
        self
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        self.seen.lock().unwrap().push(SeenRequest {
            model: request.model.to_string(),
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        });

        if self.retired.contains(request.model) {
            return Err(GenerationError::Decommissioned {
                model: request.model.to_string(),
                message: "model_decommissioned".into(),
            });
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenerationError::Status {
                    status: 503,
                    message: "service unavailable".into(),
                })
            })
    }
}

/// A journal backed by a fresh temp file. Keep the `TempDir` alive for the test.
pub fn temp_journal(generator: FakeGenerator) -> (TempDir, Journal<FakeGenerator>) {
    let tmp = TempDir::new().unwrap();
    let store = JournalStore::new(tmp.path().join("dream_journal.json"));
    let analyzer = Analyzer::new(generator, PRIMARY_MODEL, FALLBACK_MODEL);
    (tmp, Journal::new(store, analyzer))
}

pub fn entry(timestamp: &str, dream: &str, tags: &[&str], mood: &str) -> JournalEntry {
    JournalEntry {
        timestamp: timestamp.to_string(),
        dream: dream.to_string(),
        analysis: format!("analysis of {dream}"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        mood: Some(mood.to_string()),
        model_used: Some(PRIMARY_MODEL.to_string()),
    }
}

/// The two-entry journal used by the statistics and search scenarios.
pub fn seed_ocean_journal(journal: &Journal<FakeGenerator>) {
    journal
        .store()
        .append(entry("2024-01-01T07:00:00", "I flew over the sea", &["ocean", "flight"], "happy"))
        .unwrap();
    journal
        .store()
        .append(entry("2024-01-02T07:00:00", "Waves crashed on a beach", &["ocean"], "happy"))
        .unwrap();
}
