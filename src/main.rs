mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dreamlog::config::DreamlogConfig;
use dreamlog::server;

#[derive(Parser)]
#[command(name = "dreamlog", version, about = "Dream journal with language-model analysis")]
struct Cli {
    /// Config file (defaults to ~/.dreamlog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new dream
    Record {
        /// What you dreamed
        text: String,
        /// Your own mood label; classified by the model when omitted
        #[arg(long)]
        mood: Option<String>,
    },
    /// List recorded dreams
    List {
        /// Print raw JSON entries
        #[arg(long)]
        json: bool,
    },
    /// Search recent dreams
    Search {
        query: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show journal statistics
    Stats,
    /// Identify recurring patterns across all dreams
    Patterns,
    /// Serve the journal over HTTP
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DreamlogConfig::load_from(path)?,
        None => DreamlogConfig::load()?,
    };

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Record { text, mood } => cli::record::record(&config, &text, mood.as_deref()).await?,
        Command::List { json } => cli::list::list(&config, json)?,
        Command::Search { query, limit } => cli::search::search(&config, &query, limit).await?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Patterns => cli::patterns::patterns(&config).await?,
        Command::Serve => server::serve(config).await?,
    }

    Ok(())
}
