//! Error types for store operations.

use dvdrental_rs_config::ConfigError;
use dvdrental_rs_schema::SchemaError;

/// Errors returned by the database layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Schema descriptor error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    /// Row lookup matched nothing.
    #[error("not found: {0}")]
    NotFound(String),
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
