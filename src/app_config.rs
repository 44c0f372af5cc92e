use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Library configuration module
/// This module handles the lingostore configuration including loading,
/// validating and saving configuration settings.
/// Represents the library configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Locale used when no active locale has been set for an entity type
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Postfix appended to a parent table name to derive its companion
    /// translations table, e.g. posts -> posts_l10n
    #[serde(default = "default_table_postfix")]
    pub table_postfix: String,

    /// Column name holding the locale code in companion tables
    #[serde(default = "default_locale_key")]
    pub locale_key: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_table_postfix() -> String {
    "_l10n".to_string()
}

fn default_locale_key() -> String {
    "locale".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // The core treats locale codes as opaque, but the configured default
        // must at least be a known ISO code so migrations and CLI output stay
        // meaningful.
        let _default_name = crate::locale_utils::get_locale_name(&self.default_locale)?;

        if self.table_postfix.is_empty() {
            return Err(anyhow::anyhow!(
                "table_postfix must not be empty; companion tables would collide with parent tables"
            ));
        }

        if self.locale_key.is_empty() {
            return Err(anyhow::anyhow!("locale_key must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_locale: default_locale(),
            table_postfix: default_table_postfix(),
            locale_key: default_locale_key(),
            log_level: LogLevel::default(),
        }
    }
}
