use std::env::{self, VarError};
use std::path::PathBuf;
use std::time::Duration;
use tgpulse_telegram::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use thiserror::Error;

pub const BASE_URL_VAR: &str = "TGPULSE_BASE_URL";
pub const USER_AGENT_VAR: &str = "TGPULSE_USER_AGENT";
pub const TIMEOUT_VAR: &str = "TGPULSE_TIMEOUT_SECS";
pub const LEXICON_VAR: &str = "TGPULSE_LEXICON";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("{name} is not valid unicode")]
    NotUnicode { name: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub user_agent: String,
    /// No timeout unless configured.
    pub timeout: Option<Duration>,
    /// Replaces the embedded sentiment lexicon.
    pub lexicon_path: Option<PathBuf>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let read = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
            }
        };

        let timeout = match read(TIMEOUT_VAR)? {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: TIMEOUT_VAR,
                        value,
                    })
                }
            },
            None => None,
        };

        Ok(Settings {
            base_url: read(BASE_URL_VAR)?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: read(USER_AGENT_VAR)?.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout,
            lexicon_path: read(LEXICON_VAR)?.map(PathBuf::from),
        })
    }
}
