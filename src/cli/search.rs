use anyhow::{bail, Result};

use dreamlog::config::DreamlogConfig;
use dreamlog::journal::SearchSource;

use super::{capitalize, open_journal, preview, spinner};

/// Search the journal from the terminal.
pub async fn search(config: &DreamlogConfig, query: &str, limit: Option<usize>) -> Result<()> {
    if query.trim().is_empty() {
        bail!("please enter a search term");
    }

    let journal = open_journal(config)?;

    let pb = spinner("Searching...");
    let response = journal.search(query, limit).await;
    pb.finish_and_clear();

    if response.results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let how = match response.source {
        SearchSource::Model => "model-ranked",
        SearchSource::Substring => "text match",
    };
    println!("Found {} result(s) ({how}):\n", response.results.len());

    for (i, hit) in response.results.iter().enumerate() {
        let date: String = hit.timestamp.chars().take(10).collect();
        let date = if date.is_empty() { "No date".to_string() } else { date };
        println!("  {}. {}", i + 1, date);
        println!("     Preview: {}", preview(&hit.dream_preview, 150));
        println!("     Mood:    {}", capitalize(hit.mood.as_deref().unwrap_or("unknown")));
        println!("     Tags:    {}", hit.tags.join(", "));
        println!();
    }

    Ok(())
}
