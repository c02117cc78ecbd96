//! Journal entry definitions.
//!
//! [`JournalEntry`] is the only persisted record. Entries written by older
//! front ends may lack fields or use `text` instead of `dream`; every optional
//! field deserializes to its empty form so a single odd entry never hides the
//! rest of the journal.

use serde::{Deserialize, Serialize};

/// Moods the classifier is asked to pick from. Replies outside this list are kept as-is.
pub const MOOD_VOCABULARY: [&str; 8] = [
    "happy", "anxious", "fearful", "exciting", "sad", "confusing", "neutral", "other",
];

/// Mood reported for entries without one.
pub const UNKNOWN: &str = "unknown";

/// Analysis text stored when the backend could not be reached.
pub const PLACEHOLDER_ANALYSIS: &str = "Could not analyze - try again later";

/// Single tag stored when the backend could not be reached.
pub const PLACEHOLDER_TAG: &str = "unprocessed";

/// Upper bound on tags kept per entry.
pub const MAX_TAGS: usize = 5;

/// One recorded dream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// ISO 8601 creation time, local clock. The first ten characters are the calendar date.
    #[serde(default)]
    pub timestamp: String,
    /// The dream as the user wrote it.
    #[serde(default, alias = "text")]
    pub dream: String,
    /// Model commentary, or [`PLACEHOLDER_ANALYSIS`].
    #[serde(default)]
    pub analysis: String,
    /// Lowercase, deduplicated, at most [`MAX_TAGS`].
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Backend model that was active when the entry was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl JournalEntry {
    /// Mood, or `"unknown"` when absent.
    pub fn mood_or_unknown(&self) -> &str {
        self.mood.as_deref().unwrap_or(UNKNOWN)
    }

    /// Model identifier, or `"unknown"` when absent.
    pub fn model_or_unknown(&self) -> &str {
        self.model_used.as_deref().unwrap_or(UNKNOWN)
    }

    /// Calendar date part of the timestamp (`YYYY-MM-DD`).
    pub fn date(&self) -> &str {
        match self.timestamp.char_indices().nth(10) {
            Some((idx, _)) => &self.timestamp[..idx],
            None => &self.timestamp,
        }
    }
}
