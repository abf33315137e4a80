use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the storage root.
pub const ROOT_ENV_VAR: &str = "PAPER_CACHE_ROOT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl StorageConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `/content/papers` inside a notebook sandbox that mounts `/content`,
    /// `papers` relative to the working directory otherwise.
    pub fn detect() -> Self {
        if Path::new("/content").is_dir() {
            Self::new("/content/papers")
        } else {
            Self::new("papers")
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("papers")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub page_size: usize,
    pub page_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://export.arxiv.org/api/query".into(),
            user_agent: concat!("paper-cache/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1_000,
            page_size: 100,
            page_delay_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
}

impl Config {
    /// Defaults, with the storage root taken from `PAPER_CACHE_ROOT` or
    /// [`StorageConfig::detect`].
    pub fn from_env() -> Self {
        let storage = match std::env::var_os(ROOT_ENV_VAR) {
            Some(root) if !root.is_empty() => StorageConfig::new(root),
            _ => StorageConfig::detect(),
        };
        Self {
            storage,
            provider: ProviderConfig::default(),
        }
    }

    /// Load a JSON config file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let f = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(f)?)
    }
}
