//! Runner configuration with TOML file support.

use ballot_types::Identity;
use ballot_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {what}: {reason}")]
    Parse { what: &'static str, reason: String },

    #[error("no administrator configured (set `admin` in the config file, --admin or BALLOT_ADMIN)")]
    MissingAdmin,
}

/// Configuration for a ballot run.
///
/// Loaded from a TOML file via [`BallotConfig::from_toml_file`] or built in
/// code. Command-line flags override file values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotConfig {
    /// The round's administrator.
    #[serde(default)]
    pub admin: Option<Identity>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,ballot_governance=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether the event log retains records for the report.
    #[serde(default = "default_true")]
    pub record_events: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl BallotConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse {
            what: "config",
            reason: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            what: "config",
            reason: e.to_string(),
        })
    }

    /// The configured administrator, or an error if none was given.
    pub fn require_admin(&self) -> Result<Identity, ConfigError> {
        self.admin.ok_or(ConfigError::MissingAdmin)
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            admin: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            record_events: default_true(),
        }
    }
}
