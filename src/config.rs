//! Endpoint and schedule configuration with documented defaults

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::scheduler::Schedule;

fn default_usage_url() -> String {
    "https://api.anthropic.com/api/oauth/usage".to_string()
}

fn default_update_url() -> String {
    "http://claude-ticker-px.local/update".to_string()
}

fn default_interval_minutes() -> u32 {
    5
}

fn default_window_start_hour() -> u32 {
    7
}

fn default_window_end_hour() -> u32 {
    16
}

fn default_credential_entry() -> String {
    "Claude Code-credentials".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Remote usage API endpoint
    #[serde(default = "default_usage_url")]
    pub usage_url: String,
    /// Local receiver the usage document is relayed to
    #[serde(default = "default_update_url")]
    pub update_url: String,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// First hour of the daily tick window
    #[serde(default = "default_window_start_hour")]
    pub window_start_hour: u32,
    /// Last hour of the daily tick window (inclusive)
    #[serde(default = "default_window_end_hour")]
    pub window_end_hour: u32,
    /// Name of the secure-store entry holding the OAuth credential
    #[serde(default = "default_credential_entry")]
    pub credential_entry: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            usage_url: default_usage_url(),
            update_url: default_update_url(),
            interval_minutes: default_interval_minutes(),
            window_start_hour: default_window_start_hour(),
            window_end_hour: default_window_end_hour(),
            credential_entry: default_credential_entry(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Loads `<config dir>/claude-ticker/config.json` if present,
    /// defaults otherwise. A malformed file is an error; a missing
    /// one is not.
    pub fn load() -> Result<Self, ConfigError> {
        match dirs::config_dir() {
            Some(dir) => Self::load_from(&dir.join("claude-ticker").join("config.json")),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: Config = if path.exists() {
            serde_json::from_str(&fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_minutes == 0 || self.interval_minutes > 60 {
            return Err(ConfigError::Invalid(format!(
                "interval_minutes must be between 1 and 60, got {}",
                self.interval_minutes
            )));
        }
        if self.window_end_hour > 23 || self.window_start_hour > self.window_end_hour {
            return Err(ConfigError::Invalid(format!(
                "hours {}..{} are not a valid daily window",
                self.window_start_hour, self.window_end_hour
            )));
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            interval_minutes: self.interval_minutes,
            start_hour: self.window_start_hour,
            end_hour: self.window_end_hour,
        }
    }
}
