use anyhow::Result;

use dreamlog::config::DreamlogConfig;
use dreamlog::journal::stats::compute_stats;

use super::{capitalize, open_store};

/// Display journal statistics in the terminal.
pub fn stats(config: &DreamlogConfig) -> Result<()> {
    let store = open_store(config);
    let response = compute_stats(&store.load());

    println!("Journal Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total dreams:        {}", response.total_dreams);
    println!();

    println!("Top Tags:");
    for tag in &response.most_common_tags {
        println!("  {:<20} {}", tag.tag, tag.count);
    }
    println!();

    println!("Mood Distribution:");
    for (mood, count) in &response.mood_distribution {
        println!("  {:<20} {}", capitalize(mood), count);
    }
    println!();

    println!("Models Used:");
    for (model, count) in &response.models_used {
        println!("  {:<20} {}", model, count);
    }
    println!();

    println!("Dreams per Day:");
    for (date, count) in &response.dream_frequency {
        println!("  {:<20} {}", date, count);
    }

    Ok(())
}
