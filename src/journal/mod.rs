//! The dream journal: persistence, annotation, statistics, and search.
//!
//! [`Journal`] bundles a [`JournalStore`] with an [`Analyzer`] and the search
//! settings. Each operation re-reads the store file, so several `Journal`
//! values (or processes) pointed at the same file see each other's writes.

pub mod analysis;
pub mod error;
pub mod patterns;
pub mod record;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

pub use analysis::Analyzer;
pub use error::JournalError;
pub use search::{SearchHit, SearchResults, SearchSource};
pub use stats::JournalStats;
pub use store::JournalStore;
pub use types::JournalEntry;

use crate::config::DreamlogConfig;
use crate::generation::{GenerationError, TextGenerator};

pub struct Journal<G> {
    store: JournalStore,
    analyzer: Analyzer<G>,
    search_window: usize,
    default_limit: usize,
}

impl<G: TextGenerator> Journal<G> {
    pub fn new(store: JournalStore, analyzer: Analyzer<G>) -> Self {
        Self {
            store,
            analyzer,
            search_window: 50,
            default_limit: 5,
        }
    }

    /// Build a journal from configuration around an existing generator.
    pub fn from_config(config: &DreamlogConfig, generator: G) -> Self {
        let store = JournalStore::new(config.resolved_journal_path());
        let analyzer = Analyzer::new(
            generator,
            config.generation.model.clone(),
            config.generation.fallback_model.clone(),
        );
        Self::new(store, analyzer).with_search(config.search.window, config.search.default_limit)
    }

    pub fn with_search(mut self, window: usize, default_limit: usize) -> Self {
        self.search_window = window;
        self.default_limit = default_limit;
        self
    }

    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    pub fn analyzer(&self) -> &Analyzer<G> {
        &self.analyzer
    }

    /// Every stored entry, oldest first.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.store.load()
    }

    /// Record a dream. See [`record::record_dream`].
    pub async fn record(&self, text: &str, mood: Option<&str>) -> Result<JournalEntry, JournalError> {
        record::record_dream(&self.store, &self.analyzer, text, mood).await
    }

    /// Search recent entries; `None` uses the configured default limit.
    pub async fn search(&self, query: &str, limit: Option<usize>) -> SearchResults {
        let entries = self.store.load();
        let limit = limit.unwrap_or(self.default_limit);
        search::search_journal(&self.analyzer, &entries, query, limit, self.search_window).await
    }

    pub fn statistics(&self) -> JournalStats {
        stats::compute_stats(&self.store.load())
    }

    pub async fn identify_patterns(&self) -> Result<String, GenerationError> {
        let entries = self.store.load();
        patterns::identify_patterns(&self.analyzer, &entries).await
    }
}
