use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::types::JournalEntry;

/// How many tags [`JournalStats::most_common_tags`] keeps.
pub const TOP_TAGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Summary of the whole journal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct JournalStats {
    pub total_dreams: usize,
    /// Highest count first; equal counts keep first-seen order.
    pub most_common_tags: Vec<TagCount>,
    pub mood_distribution: BTreeMap<String, usize>,
    /// Keyed by calendar date (`YYYY-MM-DD`).
    pub dream_frequency: BTreeMap<String, usize>,
    pub models_used: BTreeMap<String, usize>,
}

/// Compute journal statistics in one pass over `entries`.
///
/// Entries without a mood or model are counted under `"unknown"`.
pub fn compute_stats(entries: &[JournalEntry]) -> JournalStats {
    let mut stats = JournalStats {
        total_dreams: entries.len(),
        ..JournalStats::default()
    };

    let mut tag_counts: Vec<TagCount> = Vec::new();
    let mut tag_index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        for tag in &entry.tags {
            match tag_index.get(tag.as_str()) {
                Some(&i) => tag_counts[i].count += 1,
                None => {
                    tag_index.insert(tag, tag_counts.len());
                    tag_counts.push(TagCount {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }

        *stats
            .mood_distribution
            .entry(entry.mood_or_unknown().to_string())
            .or_default() += 1;
        *stats
            .models_used
            .entry(entry.model_or_unknown().to_string())
            .or_default() += 1;
        *stats
            .dream_frequency
            .entry(entry.date().to_string())
            .or_default() += 1;
    }

    // sort_by is stable, so ties stay in first-seen order
    tag_counts.sort_by(|a, b| b.count.cmp(&a.count));
    tag_counts.truncate(TOP_TAGS);
    stats.most_common_tags = tag_counts;

    stats
}
