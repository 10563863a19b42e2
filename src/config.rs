use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::BlameError;

/// Flags the blamer reads on every relevant call.
pub trait ConfigProvider: Send + Sync {
    /// Whether revision logs (author, date, message) are fetched after blaming.
    fn enable_logs(&self) -> bool;

    /// Whether files are blamed automatically when their editor gains focus.
    fn auto_blame(&self) -> bool;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub enable_logs: bool,
    pub auto_blame: bool,
    pub log_level: LogLevel,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            enable_logs: true,
            auto_blame: false,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, BlameError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;

        serde_json::from_str(&content).map_err(|e| BlameError::InvalidConfiguration(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), BlameError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).map_err(BlameError::IoError)
    }
}

impl ConfigProvider for Config {
    fn enable_logs(&self) -> bool {
        self.enable_logs
    }

    fn auto_blame(&self) -> bool {
        self.auto_blame
    }
}

/// Configuration that can be swapped while the blamer is running.
#[derive(Debug, Default)]
pub struct SharedConfig {
    inner: RwLock<Config>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    pub fn update(&self, config: Config) {
        *self.inner.write() = config;
    }

    pub fn snapshot(&self) -> Config {
        self.inner.read().clone()
    }
}

impl ConfigProvider for SharedConfig {
    fn enable_logs(&self) -> bool {
        self.inner.read().enable_logs
    }

    fn auto_blame(&self) -> bool {
        self.inner.read().auto_blame
    }
}
