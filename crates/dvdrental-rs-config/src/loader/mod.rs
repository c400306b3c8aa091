//! TOML configuration loader.
//!
//! Reads a single config file into an in-memory `toml::Table` and exposes the
//! full mapping, the `project` section, and keyed lookups over nested tables.
//! There is no layering or merging: one file, loaded once, read many times.

mod lookup;

#[cfg(test)]
mod tests;

use crate::ConfigError;
use crate::model::{DatabaseSettings, EnvironmentSettings, ProjectSettings, Tester};
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Config path used when the caller does not supply one.
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Top-level key holding project metadata.
const PROJECT_KEY: &str = "project";
/// Top-level key holding per-environment sections.
const ENVIRONMENT_KEY: &str = "environment";
/// Top-level key holding the tester records.
const TESTERS_KEY: &str = "testers";
/// Top-level key holding the database settings.
const DATABASE_KEY: &str = "database";

/// Loaded configuration file: the path it came from and its parsed mapping.
///
/// A fresh instance holds nothing; every accessor returns
/// [`ConfigError::NotLoaded`] until [`Configuration::load`] succeeds.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    path: Option<PathBuf>,
    config: Option<Table>,
}

impl Configuration {
    /// Create an empty, unloaded configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration and load it from `path` in one step.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut configuration = Self::new();
        configuration.load(path)?;
        Ok(configuration)
    }

    /// Load the config file at `path`, replacing any previously loaded content.
    ///
    /// The path is stored exactly as given so callers can read it back with
    /// [`Configuration::get_config_file_path`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        debug!("loading config file (path={})", path.display());
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        info!(
            "config loaded (path={}, keys={})",
            path.display(),
            config.len()
        );
        self.path = Some(path.to_path_buf());
        self.config = Some(config);
        Ok(())
    }

    /// Load the config file from [`DEFAULT_CONFIG_PATH`].
    pub fn load_default(&mut self) -> Result<(), ConfigError> {
        self.load(DEFAULT_CONFIG_PATH)
    }

    /// Parse TOML contents into a mapping without touching the filesystem.
    pub fn parse(contents: &str) -> Result<Table, ConfigError> {
        debug!("parsing config contents (len={})", contents.len());
        Ok(toml::from_str::<Table>(contents)?)
    }

    /// Whether a load has succeeded on this instance.
    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// Full parsed mapping.
    pub fn get_config(&self) -> Result<&Table, ConfigError> {
        let config = self.config.as_ref().ok_or(ConfigError::NotLoaded)?;
        debug!("get_config (keys={})", config.len());
        Ok(config)
    }

    /// Path passed to the most recent successful load.
    pub fn get_config_file_path(&self) -> Result<&Path, ConfigError> {
        let path = self.path.as_deref().ok_or(ConfigError::NotLoaded)?;
        debug!("get_config_file_path (path={})", path.display());
        Ok(path)
    }

    /// Sub-mapping stored under the top-level `project` key.
    pub fn get_project(&self) -> Result<&Table, ConfigError> {
        let project = self.section(PROJECT_KEY)?;
        debug!("project settings loaded (keys={})", project.len());
        Ok(project)
    }

    /// Top-level value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.get_config()?
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Nested value addressed by a dotted path such as `environment.dev.env`.
    ///
    /// Numeric segments index into arrays, so `testers.0.username` reads the
    /// first tester record.
    pub fn lookup(&self, path: &str) -> Result<&Value, ConfigError> {
        lookup::resolve(self.get_config()?, path)
    }

    /// Top-level sub-table stored under `key`.
    pub fn section(&self, key: &str) -> Result<&Table, ConfigError> {
        self.get(key)?
            .as_table()
            .ok_or_else(|| ConfigError::InvalidType {
                key: key.to_string(),
                expected: "table",
            })
    }

    /// Deserialize the value at a dotted path into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self.lookup(path)?.clone();
        value
            .try_into()
            .map_err(|source| ConfigError::DecodeFailed {
                key: path.to_string(),
                source,
            })
    }

    /// Typed view of the `project` section.
    pub fn project_settings(&self) -> Result<ProjectSettings, ConfigError> {
        self.get_as(PROJECT_KEY)
    }

    /// Typed view of the `environment` section, keyed by environment name.
    pub fn environments(&self) -> Result<BTreeMap<String, EnvironmentSettings>, ConfigError> {
        self.get_as(ENVIRONMENT_KEY)
    }

    /// Typed view of the `testers` array of tables.
    pub fn testers(&self) -> Result<Vec<Tester>, ConfigError> {
        self.get_as(TESTERS_KEY)
    }

    /// Typed view of the `database` section, falling back to defaults when
    /// the section is absent.
    pub fn database_settings(&self) -> Result<DatabaseSettings, ConfigError> {
        match self.get_as(DATABASE_KEY) {
            Ok(settings) => Ok(settings),
            Err(ConfigError::MissingKey(_)) => {
                debug!("database section absent; using defaults");
                Ok(DatabaseSettings::default())
            }
            Err(err) => Err(err),
        }
    }
}
