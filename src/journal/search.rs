//! Journal search.
//!
//! The backend is asked to pick the most relevant of the recent entries and reply
//! with JSON. Any failure on that path (remote error, unparsable reply) falls back
//! to a case-insensitive substring match over dream text, analysis, and tags.
//! Search itself never fails.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::generation::TextGenerator;

use super::analysis::{Analyzer, Sampling};
use super::types::JournalEntry;

const SEARCH_SYSTEM: &str = "You search dream journals and return JSON results.";
const SEARCH_SAMPLING: Sampling = Sampling { max_tokens: 1000, temperature: 0.4 };

/// Which path produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Model,
    Substring,
}

/// One search result. Substring matches carry the full dream and analysis text;
/// model results carry whatever previews the model wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, alias = "dream")]
    pub dream_preview: String,
    #[serde(default, alias = "analysis")]
    pub analysis_preview: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub source: SearchSource,
    pub results: Vec<SearchHit>,
}

impl From<&JournalEntry> for SearchHit {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            dream_preview: entry.dream.clone(),
            analysis_preview: entry.analysis.clone(),
            mood: entry.mood.clone(),
            tags: entry.tags.clone(),
        }
    }
}

/// Search the `window` most recent entries for `query`, returning at most `limit` hits.
///
/// An empty journal, a blank query, or a zero limit returns no results without
/// contacting the backend.
pub async fn search_journal<G: TextGenerator>(
    analyzer: &Analyzer<G>,
    entries: &[JournalEntry],
    query: &str,
    limit: usize,
    window: usize,
) -> SearchResults {
    let query = query.trim();
    let recent = &entries[entries.len().saturating_sub(window)..];

    if recent.is_empty() || query.is_empty() || limit == 0 {
        return SearchResults {
            source: SearchSource::Substring,
            results: Vec::new(),
        };
    }

    match search_with_model(analyzer, recent, query, limit).await {
        Ok(results) => {
            tracing::debug!(query, hits = results.len(), "model search succeeded");
            SearchResults {
                source: SearchSource::Model,
                results,
            }
        }
        Err(reason) => {
            tracing::info!(query, reason = %reason, "model search failed, using substring match");
            SearchResults {
                source: SearchSource::Substring,
                results: substring_search(recent, query, limit),
            }
        }
    }
}

async fn search_with_model<G: TextGenerator>(
    analyzer: &Analyzer<G>,
    recent: &[JournalEntry],
    query: &str,
    limit: usize,
) -> Result<Vec<SearchHit>, String> {
    let entries_json = serde_json::to_string(recent).map_err(|e| e.to_string())?;
    let prompt = format!(
        "Find {limit} journal entries most relevant to: \"{query}\".\n\
         Consider dream content, analysis, tags, and mood.\n\n\
         Entries: {entries_json}\n\n\
         Return only a JSON array of objects with keys: \
         timestamp, dream_preview, analysis_preview, mood, tags"
    );

    let raw = analyzer
        .complete(&prompt, SEARCH_SYSTEM, SEARCH_SAMPLING)
        .await
        .map_err(|e| e.to_string())?;

    let mut hits = parse_model_hits(&raw)?;
    hits.truncate(limit);
    Ok(hits)
}

/// Best-effort parse of the model's reply.
///
/// Accepts a bare array, an object wrapping an array (`{"results": [...]}`), or a
/// single result object, optionally inside a Markdown code fence.
pub fn parse_model_hits(raw: &str) -> Result<Vec<SearchHit>, String> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body).map_err(|e| format!("reply is not JSON: {e}"))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            let wrapped = map.values().find(|v| v.is_array()).cloned();
            match wrapped {
                Some(Value::Array(items)) => items,
                _ => vec![Value::Object(map)],
            }
        }
        other => return Err(format!("unexpected JSON reply: {other}")),
    };

    items
        .into_iter()
        .map(|item| {
            if !item.is_object() {
                return Err(format!("result is not an object: {item}"));
            }
            serde_json::from_value(item).map_err(|e| e.to_string())
        })
        .collect()
}

/// Case-insensitive substring match, in stored order.
pub fn substring_search(entries: &[JournalEntry], query: &str, limit: usize) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.dream.to_lowercase().contains(&needle)
                || entry.analysis.to_lowercase().contains(&needle)
                || entry.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .take(limit)
        .map(SearchHit::from)
        .collect()
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (e.g. `json`) on the opening line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Tags may come back as an array or as one comma-separated string.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}
