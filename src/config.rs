//! Client configuration.
//!
//! Layers, lowest precedence first: built-in defaults, `config.toml`, environment
//! (read through `dotenvy`, so a `.env` file works too), then command-line overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const ENV_CONFIG: &str = "ALPHAQUERY_CONFIG";
pub const ENV_ENDPOINT: &str = "ALPHAQUERY_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "ALPHAQUERY_TIMEOUT_MS";
pub const ENV_DATA_DIR: &str = "ALPHAQUERY_DATA_DIR";
pub const ENV_CATEGORY_MATCH: &str = "ALPHAQUERY_CATEGORY_MATCH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// How a selected category is matched against a result's category string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMatch {
    /// Selected label occurs anywhere in the comma-joined string ("A" matches "AB").
    #[default]
    Substring,
    /// Selected label equals one of the comma-separated labels.
    Exact,
}

impl CategoryMatch {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "exact" => Some(Self::Exact),
            _ => None,
        }
    }
}

/// Resolved settings used by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the search service; `/api/search` is appended.
    pub endpoint: String,
    pub timeout: Duration,
    /// Holds the session cache and the TUI log.
    pub data_dir: PathBuf,
    pub category_match: CategoryMatch,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            data_dir: default_data_dir(),
            category_match: CategoryMatch::default(),
        }
    }
}

/// Shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    data_dir: Option<PathBuf>,
    category_match: Option<CategoryMatch>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    /// Resolve the full layer stack.
    pub fn load(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        let file = dotenvy::var(ENV_CONFIG)
            .map(PathBuf::from)
            .ok()
            .or_else(default_config_path);
        if let Some(path) = file
            && path.exists()
        {
            cfg.apply_file(&path)?;
        }

        cfg.apply_env()?;
        cfg.apply_overrides(overrides);
        Ok(cfg)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");

        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(ms) = file.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(mode) = file.category_match {
            self.category_match = mode;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(endpoint) = dotenvy::var(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Ok(val) = dotenvy::var(ENV_TIMEOUT_MS) {
            let ms = val
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_MS,
                    value: val.clone(),
                })?;
            self.timeout = Duration::from_millis(ms);
        }
        if let Ok(dir) = dotenvy::var(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(val) = dotenvy::var(ENV_CATEGORY_MATCH) {
            self.category_match =
                CategoryMatch::parse(&val).ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_CATEGORY_MATCH,
                    value: val.clone(),
                })?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(dir) = &overrides.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(ms) = overrides.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn log_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "alphaquery", "alphaquery")
}

pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".alphaquery"))
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
