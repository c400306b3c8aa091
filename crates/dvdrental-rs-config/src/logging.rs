//! Logging configuration read from its own TOML file.
//!
//! The file only describes levels and output style; installing a logger is
//! left to the binary so library crates never touch global logger state.

use crate::ConfigError;
use log::{LevelFilter, debug};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Logging config path used when the caller does not supply one.
pub const DEFAULT_LOG_CONFIG_PATH: &str = "./log_config.toml";

/// Level threshold accepted in the logging config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Whether log output may carry terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogWriteStyle {
    #[default]
    Auto,
    Always,
    Never,
}

/// Parsed logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default level for every module.
    #[serde(default)]
    pub level: LogLevel,
    /// Per-module overrides keyed by module path (for example `dvdrental_rs_store`).
    #[serde(default)]
    pub modules: BTreeMap<String, LogLevel>,
    #[serde(default)]
    pub write_style: LogWriteStyle,
    /// Prefix each record with a timestamp.
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            modules: BTreeMap::new(),
            write_style: LogWriteStyle::default(),
            timestamps: default_timestamps(),
        }
    }
}

fn default_timestamps() -> bool {
    true
}

impl LogConfig {
    /// Load a logging config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a logging config from TOML contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let config: LogConfig = toml::from_str(contents)?;
        debug!(
            "logging config parsed (level={:?}, modules={})",
            config.level,
            config.modules.len()
        );
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::FileNotFound { .. }) => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogConfig, LogLevel, LogWriteStyle};
    use crate::ConfigError;
    use log::LevelFilter;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_uses_defaults() {
        let config = LogConfig::load_from_str("").expect("config");
        assert_eq!(config, LogConfig::default());
        assert_eq!(LevelFilter::from(config.level), LevelFilter::Info);
        assert!(config.timestamps);
    }

    #[test]
    fn parses_levels_and_module_overrides() {
        let config = LogConfig::load_from_str(
            r#"
            level = "debug"
            write_style = "never"
            timestamps = false

            [modules]
            dvdrental_rs_store = "warn"
            "#,
        )
        .expect("config");
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.write_style, LogWriteStyle::Never);
        assert_eq!(config.modules.get("dvdrental_rs_store"), Some(&LogLevel::Warn));
        assert!(!config.timestamps);
    }

    #[test]
    fn rejects_unknown_level() {
        let err = LogConfig::load_from_str(r#"level = "critical""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn missing_file_falls_back_only_when_requested() {
        let temp = TempDir::new().expect("tmp");
        let path = temp.path().join("absent.toml");
        assert!(matches!(
            LogConfig::load(&path),
            Err(ConfigError::FileNotFound { .. })
        ));
        let config = LogConfig::load_or_default(&path).expect("default");
        assert_eq!(config, LogConfig::default());
    }
}
