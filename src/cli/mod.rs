pub mod list;
pub mod patterns;
pub mod record;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use dreamlog::config::DreamlogConfig;
use dreamlog::generation::{self, Generator};
use dreamlog::journal::{Journal, JournalStore};

/// Open the journal with the configured text-generation backend.
pub fn open_journal(config: &DreamlogConfig) -> Result<Journal<Generator>> {
    let generator = generation::create_generator(&config.generation).context(
        "failed to set up text generation (set generation.provider = \"disabled\" to run offline)",
    )?;
    Ok(Journal::from_config(config, generator))
}

/// Open only the store, for commands that never call the backend.
pub fn open_store(config: &DreamlogConfig) -> JournalStore {
    JournalStore::new(config.resolved_journal_path())
}

/// Spinner on stderr while waiting on the backend.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// First `max` characters of `text`, with `...` when cut.
pub fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// `happy` -> `Happy`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
