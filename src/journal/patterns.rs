use crate::generation::{GenerationError, TextGenerator};

use super::analysis::{Analyzer, Sampling, ANALYSIS_SAMPLING};
use super::types::JournalEntry;

const PATTERNS_SYSTEM: &str = "You identify patterns in dream journals.";
const PATTERNS_SAMPLING: Sampling = Sampling {
    max_tokens: 1000,
    ..ANALYSIS_SAMPLING
};

/// Reply used when there is nothing to analyse.
pub const NO_ENTRIES: &str = "No journal entries available for analysis.";

/// Ask the backend for recurring themes across every entry.
///
/// Unlike recording and search, there is nothing to degrade to here, so backend
/// errors are returned.
pub async fn identify_patterns<G: TextGenerator>(
    analyzer: &Analyzer<G>,
    entries: &[JournalEntry],
) -> Result<String, GenerationError> {
    if entries.is_empty() {
        return Ok(NO_ENTRIES.to_string());
    }

    let entries_json = serde_json::to_string(entries)
        .map_err(|e| GenerationError::InvalidResponse(format!("failed to encode entries: {e}")))?;
    let prompt = format!(
        "Analyze these dream journal entries for recurring patterns.\n\
         Identify 3-5 key insights about themes, symbols, or emotional trends.\n\n\
         Journal Entries: {entries_json}\n\nKey Insights:"
    );

    analyzer.complete(&prompt, PATTERNS_SYSTEM, PATTERNS_SAMPLING).await
}
