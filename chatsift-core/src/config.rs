//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chatsift/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chatsift/` (~/.config/chatsift/)
//! - State/Logs: `$XDG_STATE_HOME/chatsift/` (~/.local/state/chatsift/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Archive location
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Search presentation settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Conversation listing settings
    #[serde(default)]
    pub conversations: ConversationsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the export lives when `--file` is not given
#[derive(Debug, Deserialize)]
pub struct ArchiveConfig {
    /// Path to `conversations.json`
    #[serde(default = "default_archive_path")]
    pub path: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: default_archive_path(),
        }
    }
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("conversations.json")
}

/// Search configuration
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results printed by the CLI
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

fn default_result_limit() -> usize {
    20
}

/// Conversation listing configuration
#[derive(Debug, Deserialize)]
pub struct ConversationsConfig {
    /// Default `--limit` for the conversations command
    #[serde(default = "default_conversation_limit")]
    pub default_limit: usize,
}

impl Default for ConversationsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_conversation_limit(),
        }
    }
}

fn default_conversation_limit() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path, or defaults if there is no file.
    ///
    /// Runs before logging can be enabled, so it records nothing itself; see
    /// [`Config::file_exists`].
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Whether a config file is present at [`Config::config_path`].
    pub fn file_exists() -> bool {
        Self::config_path().exists()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        if config.search.result_limit == 0 {
            return Err(Error::Config(
                "search.result_limit must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chatsift/config.toml` (~/.config/chatsift/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chatsift").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/chatsift/` (~/.local/state/chatsift/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chatsift")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/chatsift/chatsift.log` (~/.local/state/chatsift/chatsift.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("chatsift.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
