use anyhow::Result;

use dreamlog::config::DreamlogConfig;

use super::{capitalize, open_journal, spinner};

/// Record a dream and print the annotations it received.
pub async fn record(config: &DreamlogConfig, text: &str, mood: Option<&str>) -> Result<()> {
    let journal = open_journal(config)?;

    let pb = spinner("Analyzing your dream...");
    let result = journal.record(text, mood).await;
    pb.finish_and_clear();
    let entry = result?;

    println!("Dream recorded!");
    println!();
    println!("Analysis: {}", entry.analysis);
    println!("Mood:     {}", capitalize(entry.mood_or_unknown()));
    println!("Tags:     {}", entry.tags.join(", "));

    Ok(())
}
