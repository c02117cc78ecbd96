use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by journal operations.
///
/// Backend failures are not in here: recording absorbs them into a degraded
/// entry and search falls back to substring matching.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to write journal at {}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize journal entries")]
    Serialize(#[from] serde_json::Error),
}
