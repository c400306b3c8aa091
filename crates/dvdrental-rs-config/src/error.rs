//! Error types for config loading and lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or reading config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config path does not exist.
    #[error("file not found at {}", path.display())]
    FileNotFound { path: PathBuf },
    /// A requested key is absent from the loaded mapping.
    #[error("missing key: {0}")]
    MissingKey(String),
    /// The mapping was read before a successful load.
    #[error("config not loaded")]
    NotLoaded,
    /// A key exists but holds a value of the wrong shape.
    #[error("invalid type at {key}: expected {expected}")]
    InvalidType { key: String, expected: &'static str },
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a config file failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),
    /// Converting a section into a typed model failed.
    #[error("failed to decode {key}: {source}")]
    DecodeFailed {
        key: String,
        #[source]
        source: toml::de::Error,
    },
}
