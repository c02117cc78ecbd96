//! Dream journal: record dreams, let a language model annotate them, and look back.
//!
//! Each dream is stored as a [`journal::JournalEntry`] in a single JSON file. When a
//! dream is recorded, a remote text-generation backend supplies an analysis, up to
//! five tags, and (unless the user gave one) a mood. The journal can be searched,
//! summarised into statistics, and scanned for recurring patterns.
//!
//! Recording never loses the dream: if the backend is unreachable the entry is
//! stored with placeholder annotations. Search never fails: if the backend cannot
//! rank entries, a plain substring match is used instead.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`generation`]: The text-generation capability and its HTTP implementation
//! - [`journal`]: Store, entry builder, analysis prompts, statistics, and search
//! - [`server`]: HTTP routes over the journal

pub mod config;
pub mod generation;
pub mod journal;
pub mod server;
