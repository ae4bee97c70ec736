//! Configuration persisted as `config.json` in the data directory.
//!
//! Every field is optional in the file; missing fields take their defaults
//! and command-line flags override whatever the file says.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, FileBackend, HttpBackend};
use crate::fields::Theme;

/// Name of the data directory under `$HOME`.
pub const DATA_DIR: &str = ".template_board";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_DATA_FILE: &str = "board.json";
pub const LOG_FILE: &str = "template_board.log";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the HTTP API. When unset the local JSON file is used.
    pub api_url: Option<String>,
    /// JSON database file, relative to the data directory unless absolute.
    pub data_file: PathBuf,
    /// `tracing` filter directive, e.g. `info` or `template_board=debug`.
    pub log_level: String,
    /// HTTP request timeout.
    pub timeout_secs: u64,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: "info".to_string(),
            timeout_secs: 10,
            theme: Theme::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub data_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub theme: Option<Theme>,
}

/// `--dir` if given, else `$HOME/.template_board`.
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(DATA_DIR)
        }
    }
}

/// Read `config.json` from `dir`. A missing file yields the defaults; a file
/// that exists but does not parse is an error.
pub fn load_config(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_config(dir: &Path, config: &Config) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(dir.join(CONFIG_FILE), json).context("Failed to write config file")
}

impl Config {
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.api_url = Some(url);
        }
        if let Some(file) = overrides.data_file {
            self.data_file = file;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        self
    }

    /// Database path, resolved against the data directory.
    pub fn data_path(&self, dir: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            dir.join(&self.data_file)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP backend when `api_url` is set, local JSON file otherwise.
    pub fn build_backend(&self, dir: &Path) -> Result<Arc<dyn Backend>> {
        match self.api_url.as_deref().filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let backend = HttpBackend::new(url, self.timeout()).context("Invalid API url")?;
                Ok(Arc::new(backend))
            }
            None => {
                let path = self.data_path(dir);
                let backend = FileBackend::open(&path)
                    .with_context(|| format!("Failed to open database {}", path.display()))?;
                Ok(Arc::new(backend))
            }
        }
    }
}
