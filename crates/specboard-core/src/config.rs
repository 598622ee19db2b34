use crate::error::{Result, SpecboardError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_DIR: &str = ".specboard";
pub const CONFIG_FILE: &str = "config.yaml";
pub const RECENT_FILE: &str = "recent.json";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Quiet window before a burst of changes triggers a re-scan.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How often the watched tree is re-fingerprinted.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Directory levels below the project root covered by the watcher.
    #[serde(default = "default_watch_depth")]
    pub watch_depth: usize,
    #[serde(default)]
    pub server: ServerConfig,
    /// Extra roots allowed in addition to home, `/Users` and `/home`.
    #[serde(default)]
    pub allowed_roots: Vec<PathBuf>,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    300
}

fn default_watch_depth() -> usize {
    3
}

fn default_recent_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            watch_depth: default_watch_depth(),
            server: ServerConfig::default(),
            allowed_roots: Vec::new(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl Config {
    /// `~/.specboard`
    pub fn dir() -> Result<PathBuf> {
        home::home_dir()
            .map(|h| h.join(CONFIG_DIR))
            .ok_or(SpecboardError::HomeNotFound)
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::dir()?.join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    /// Load from `explicit` when given, otherwise from `~/.specboard/config.yaml`.
    /// Without a home directory the defaults are used.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Ok(p) => Self::load(&p),
                Err(SpecboardError::HomeNotFound) => Ok(Self::default()),
                Err(e) => Err(e),
            },
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
