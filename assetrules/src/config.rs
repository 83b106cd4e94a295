//! Runtime configuration loaded from `.assetrules/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::handlers::HANDLER_NAMES;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "ASSETRULES_CONFIG";

/// Config file looked up relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".assetrules/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub handlers: HandlerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// Handler names in dispatch order.
    #[serde(default = "default_enabled_handlers")]
    pub enabled: Vec<String>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled_handlers(),
        }
    }
}

fn default_enabled_handlers() -> Vec<String> {
    HANDLER_NAMES.iter().map(|name| name.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Loads from `explicit`, then `$ASSETRULES_CONFIG`, then
    /// `.assetrules/config.toml`, falling back to defaults when none exists.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Self::from_file(Path::new(&path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_PATH);
        if local.exists() {
            return Self::from_file(&local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })
    }
}
