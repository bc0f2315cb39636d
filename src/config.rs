//! Runtime configuration.
//!
//! Values are resolved per field in this order: explicit overrides (CLI flags),
//! environment variables, an optional YAML file, built-in defaults. The remote
//! URL and anon key have no default.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_URL: &str = "CADMIN_URL";
pub const ENV_ANON_KEY: &str = "CADMIN_ANON_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CADMIN_TIMEOUT_SECS";
pub const ENV_CONFIG_FILE: &str = "CADMIN_CONFIG";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(code(community_admin::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    #[diagnostic(code(community_admin::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing required setting: {field}")]
    #[diagnostic(
        code(community_admin::config::missing),
        help("Set it with a flag, the {env} environment variable or the config file.")
    )]
    Missing { field: &'static str, env: &'static str },

    #[error("Invalid value for {field}: {message}")]
    #[diagnostic(code(community_admin::config::invalid))]
    Invalid { field: &'static str, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub anon_key: String,
    pub timeout_secs: u64,
    pub debounce_ms: u64,
    pub page_size: usize,
}

/// Values supplied explicitly, typically from command line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    url: Option<String>,
    anon_key: Option<String>,
    timeout_secs: Option<u64>,
    debounce_ms: Option<u64>,
    page_size: Option<usize>,
}

impl FileConfig {
    fn read(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn load(overrides: ConfigOverrides) -> ConfigResult<Self> {
        let file = match overrides
            .file
            .clone()
            .or_else(|| env_value(ENV_CONFIG_FILE).map(PathBuf::from))
        {
            Some(path) => FileConfig::read(&path)?,
            None => FileConfig::default(),
        };

        let url = overrides
            .url
            .or_else(|| env_value(ENV_URL))
            .or(file.url)
            .ok_or(ConfigError::Missing {
                field: "url",
                env: ENV_URL,
            })?;
        let anon_key = overrides
            .anon_key
            .or_else(|| env_value(ENV_ANON_KEY))
            .or(file.anon_key)
            .ok_or(ConfigError::Missing {
                field: "anon_key",
                env: ENV_ANON_KEY,
            })?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env_value(ENV_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    field: "timeout_secs",
                    message: format!("'{raw}' is not a whole number of seconds"),
                })?,
                None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };

        let page_size = file.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            timeout_secs,
            debounce_ms: file.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
            page_size,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
