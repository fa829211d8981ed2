//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/learnpulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/learnpulse/` (~/.config/learnpulse/)
//! - State/Logs: `$XDG_STATE_HOME/learnpulse/` (~/.local/state/learnpulse/)

use crate::calendar::DayBoundary;
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
    /// LMS API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Calendar-day resolution
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// LMS API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// API base URL (e.g., `http://localhost:8000`)
    pub base_url: Option<String>,

    /// Default user whose attendance is fetched
    pub user_id: Option<String>,

    /// Bearer token (can also use `LEARNPULSE_API_TOKEN`)
    pub api_token: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    /// Max retry attempts for transient failures
    #[serde(default = "default_api_max_retries")]
    pub max_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_id: None,
            api_token: None,
            timeout_secs: default_api_timeout(),
            max_retries: default_api_max_retries(),
        }
    }
}

impl ApiConfig {
    /// Check if the API is configured well enough to fetch records
    pub fn is_ready(&self) -> bool {
        self.base_url.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let Some(base_url) = &self.base_url else {
            return Err(Error::Config("api.base_url is required".to_string()));
        };
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api.base_url must start with http:// or https:// (got {})",
                base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Token from config, falling back to the environment.
    pub fn resolved_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var("LEARNPULSE_API_TOKEN").ok())
    }
}

fn default_api_timeout() -> u64 {
    30
}

fn default_api_max_retries() -> usize {
    3
}

/// Calendar configuration
#[derive(Debug, Deserialize)]
pub struct CalendarConfig {
    /// Timezone deciding calendar-day boundaries: `utc`, `local`, or `±HH:MM`
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl CalendarConfig {
    /// Parse the configured timezone into a [`DayBoundary`].
    pub fn boundary(&self) -> Result<DayBoundary> {
        self.timezone
            .parse()
            .map_err(|e| Error::Config(format!("calendar.timezone: {}", e)))
    }
}

fn default_timezone() -> String {
    "utc".to_string()
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
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        // Surface a bad timezone at load time rather than mid-report
        config.calendar.boundary()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/learnpulse/config.toml` (~/.config/learnpulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("learnpulse").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/learnpulse/` (~/.local/state/learnpulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("learnpulse")
    }

    /// Returns the log file prefix; daily files append `.<date>`
    ///
    /// `$XDG_STATE_HOME/learnpulse/learnpulse.log` (~/.local/state/learnpulse/learnpulse.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join(crate::logging::LOG_FILE_PREFIX)
    }
}
