//! Entry builder. Validates, annotates, appends.
//!
//! [`record_dream`] is the single write path. Backend failures never reach the
//! caller: the entry is stored with placeholder annotations instead, so the
//! dream text itself is never lost.

use chrono::{Local, SecondsFormat};

use crate::generation::{GenerationError, TextGenerator};

use super::analysis::Analyzer;
use super::error::JournalError;
use super::store::JournalStore;
use super::types::{JournalEntry, PLACEHOLDER_ANALYSIS, PLACEHOLDER_TAG, UNKNOWN};

/// Model output for one dream.
struct Annotation {
    analysis: String,
    tags: Vec<String>,
    mood: String,
}

/// Build an entry for `text` and append it to the store.
///
/// A supplied `mood` is stored as given; a missing or blank one is classified
/// by the backend.
pub async fn record_dream<G: TextGenerator>(
    store: &JournalStore,
    analyzer: &Analyzer<G>,
    text: &str,
    mood: Option<&str>,
) -> Result<JournalEntry, JournalError> {
    if text.trim().is_empty() {
        return Err(JournalError::InvalidInput("dream text must not be empty".into()));
    }
    let mood = mood.map(str::trim).filter(|m| !m.is_empty());

    let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);

    let annotation = match annotate(analyzer, text, mood).await {
        Ok(annotation) => annotation,
        Err(e) => {
            tracing::warn!(error = %e, "analysis failed, storing degraded entry");
            Annotation {
                analysis: PLACEHOLDER_ANALYSIS.to_string(),
                tags: vec![PLACEHOLDER_TAG.to_string()],
                mood: mood.unwrap_or(UNKNOWN).to_string(),
            }
        }
    };

    let entry = JournalEntry {
        timestamp,
        dream: text.to_string(),
        analysis: annotation.analysis,
        tags: annotation.tags,
        mood: Some(annotation.mood),
        model_used: Some(analyzer.current_model()),
    };

    let total = store.append(entry.clone())?;
    tracing::info!(
        total,
        mood = entry.mood_or_unknown(),
        tags = entry.tags.len(),
        "dream recorded"
    );

    Ok(entry)
}

async fn annotate<G: TextGenerator>(
    analyzer: &Analyzer<G>,
    text: &str,
    mood: Option<&str>,
) -> Result<Annotation, GenerationError> {
    let analysis = analyzer.analyze(text).await?;
    let tags = analyzer.extract_tags(text).await?;
    let mood = match mood {
        Some(m) => m.to_string(),
        None => analyzer.detect_mood(text).await?,
    };
    Ok(Annotation { analysis, tags, mood })
}
