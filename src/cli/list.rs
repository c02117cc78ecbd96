use anyhow::Result;

use dreamlog::config::DreamlogConfig;

use super::{capitalize, open_store, preview};

/// Print every entry, oldest first. `json` dumps the raw entries instead.
pub fn list(config: &DreamlogConfig, json: bool) -> Result<()> {
    let store = open_store(config);
    let entries = store.load();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No dreams recorded yet ({}).", store.path().display());
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {} [{}]", i + 1, entry.date(), capitalize(entry.mood_or_unknown()));
        println!("     {}", preview(&entry.dream, 120));
        if !entry.tags.is_empty() {
            println!("     Tags: {}", entry.tags.join(", "));
        }
        println!();
    }

    Ok(())
}
