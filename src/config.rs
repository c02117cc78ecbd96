use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DreamlogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub journal_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// `openai_compatible` or `disabled`.
    pub provider: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Model swapped in once when the primary reports it was decommissioned.
    pub fallback_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// How many of the most recent entries a search looks at.
    pub window: usize,
    pub default_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let journal_path = default_dreamlog_dir()
            .join("dream_journal.json")
            .to_string_lossy()
            .into_owned();
        Self { journal_path }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "openai_compatible".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            api_key: String::new(),
            model: "llama3-8b-8192".into(),
            fallback_model: "llama3-70b-8192".into(),
            timeout_secs: 60,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window: 50,
            default_limit: 5,
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns `~/.dreamlog/`, or `./.dreamlog/` when no home directory is known.
pub fn default_dreamlog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dreamlog")
}

/// Returns the default config file path: `~/.dreamlog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_dreamlog_dir().join("config.toml")
}

impl DreamlogConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DreamlogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// The API key is taken from `DREAMLOG_API_KEY`, then the provider-specific
    /// `GROQ_API_KEY` and `OPENAI_API_KEY`, first one set wins.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DREAMLOG_JOURNAL") {
            self.storage.journal_path = val;
        }
        if let Ok(val) = std::env::var("DREAMLOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("DREAMLOG_MODEL") {
            self.generation.model = val;
        }
        if let Ok(val) = std::env::var("DREAMLOG_BASE_URL") {
            self.generation.base_url = val;
        }
        let api_key = ["DREAMLOG_API_KEY", "GROQ_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()));
        if let Some(val) = api_key {
            self.generation.api_key = val;
        }
    }

    /// Resolve the journal path, expanding `~` if needed.
    pub fn resolved_journal_path(&self) -> PathBuf {
        expand_tilde(&self.storage.journal_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DreamlogConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.generation.provider, "openai_compatible");
        assert_eq!(config.generation.fallback_model, "llama3-70b-8192");
        assert_eq!(config.search.window, 50);
        assert_eq!(config.search.default_limit, 5);
        assert!(config.storage.journal_path.ends_with("dream_journal.json"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 8080

[storage]
journal_path = "/tmp/dreams.json"

[generation]
model = "gpt-4o-mini"
base_url = "https://api.openai.com/v1"
"#;
        let config: DreamlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.journal_path, "/tmp/dreams.json");
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.base_url, "https://api.openai.com/v1");
        // defaults still apply for unset fields
        assert_eq!(config.generation.timeout_secs, 60);
        assert_eq!(config.search.window, 50);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = DreamlogConfig::load_from(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = DreamlogConfig::default();
        std::env::set_var("DREAMLOG_JOURNAL", "/tmp/override.json");
        std::env::set_var("DREAMLOG_LOG_LEVEL", "trace");
        std::env::set_var("DREAMLOG_MODEL", "override-model");
        std::env::set_var("DREAMLOG_API_KEY", "secret");

        config.apply_env_overrides();

        assert_eq!(config.storage.journal_path, "/tmp/override.json");
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.generation.model, "override-model");
        assert_eq!(config.generation.api_key, "secret");

        // Clean up
        std::env::remove_var("DREAMLOG_JOURNAL");
        std::env::remove_var("DREAMLOG_LOG_LEVEL");
        std::env::remove_var("DREAMLOG_MODEL");
        std::env::remove_var("DREAMLOG_API_KEY");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/dreams.json"), PathBuf::from("/var/dreams.json"));
    }
}
