//! Typed models for the known configuration sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata stored under `[project]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSettings {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub author: String,
}

/// One entry under `[environment.<name>]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub env: String,
}

/// One `[[testers]]` record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tester {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// Database location stored under `[database]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:` for a private in-memory database.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// Create the schema and load the bundled sample rows on open.
    #[serde(default)]
    pub seed_sample: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            seed_sample: false,
        }
    }
}

impl DatabaseSettings {
    /// Whether the settings point at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_PATH
    }
}

/// Path marker for an in-memory SQLite database.
const IN_MEMORY_PATH: &str = ":memory:";

fn default_database_path() -> PathBuf {
    PathBuf::from(IN_MEMORY_PATH)
}
