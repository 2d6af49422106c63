use crate::error::{Result, ScrapeError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub output: OutputConfig,
    /// Optional TOML file with identity-correction rules; the built-in
    /// defaults apply when absent.
    pub rules_file: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub base_url: String,
    /// Any valid snapshot id works as the index entry point; the archive
    /// renders the full schedule list on every snapshot page.
    pub entry_snapshot_id: String,
    pub timeout_seconds: u64,
    pub max_concurrent: usize,
    /// Retries apply to network errors only, never to HTTP-status or
    /// schema failures.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Upper bound on the whole fetch batch; 0 disables the deadline.
    pub batch_deadline_seconds: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.fifa.com/fifa-world-ranking/ranking-table/men/rank".to_string(),
            entry_snapshot_id: "id1".to_string(),
            timeout_seconds: 30,
            max_concurrent: 8,
            max_retries: 2,
            retry_backoff_ms: 500,
            batch_deadline_seconds: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: ".".to_string() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: ArchiveConfig::default(),
            output: OutputConfig::default(),
            rules_file: None,
        }
    }
}

impl Config {
    /// Loads configuration. An explicitly given path must exist; otherwise
    /// `config.toml` is read when present and defaults are used when not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    ScrapeError::Config(format!("Failed to read config file '{}': {}", p, e))
                })?;
                Ok(toml::from_str(&content)?)
            }
            None => {
                let default_path = "config.toml";
                if Path::new(default_path).exists() {
                    let content = fs::read_to_string(default_path)?;
                    Ok(toml::from_str(&content)?)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }
}
