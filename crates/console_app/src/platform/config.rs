//! RON configuration for the console binary.
//!
//! A missing file is not an error: every field has a default, and a partial
//! file only overrides the fields it names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use console_core::UiState;
use console_engine::ClientSettings;
use console_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "./console.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Control center root; every route is resolved against it.
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub csrf_cookie: String,
    /// `name=value` cookies sent with every request (session id, csrf token).
    pub cookies: Vec<String>,
    /// View mode, theme and panel states the page starts with.
    pub ui: UiState,
    pub log_destination: LogTarget,
    pub log_file: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            poll_interval_ms: 2_000,
            connect_timeout_ms: duration_ms(client.connect_timeout),
            request_timeout_ms: duration_ms(client.request_timeout),
            csrf_cookie: client.csrf_cookie,
            cookies: Vec::new(),
            ui: UiState::default(),
            log_destination: LogTarget::File,
            log_file: PathBuf::from("./console.log"),
        }
    }
}

impl ConsoleConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            csrf_cookie: self.csrf_cookie.clone(),
            cookies: self.cookies.clone(),
            ..ClientSettings::default()
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(self)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Where a loaded configuration came from. Loading happens before the
/// logger exists, so the caller reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

/// Loads the configuration at `path`, falling back to defaults when the file
/// does not exist.
pub fn load(path: &Path) -> Result<(ConsoleConfig, ConfigSource), ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let config = ConsoleConfig::default().validate()?;
            return Ok((config, ConfigSource::Defaults));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: ConsoleConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((config.validate()?, ConfigSource::File))
}
