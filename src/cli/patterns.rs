use anyhow::Result;

use dreamlog::config::DreamlogConfig;

use super::{open_journal, spinner};

/// Ask the backend for recurring patterns across the journal.
pub async fn patterns(config: &DreamlogConfig) -> Result<()> {
    let journal = open_journal(config)?;

    let pb = spinner("Analyzing patterns...");
    let result = journal.identify_patterns().await;
    pb.finish_and_clear();
    let patterns = result?;

    println!("Patterns Found:");
    println!("{patterns}");
    Ok(())
}
