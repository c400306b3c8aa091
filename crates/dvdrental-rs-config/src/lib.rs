//! Configuration loading for dvdrental-rs.
//!
//! This crate owns the TOML-backed `Configuration` reader, the typed section
//! models layered on top of it, and the logging config consumed by the binary.

mod error;
mod loader;
mod logging;
mod model;

/// Public error type returned by config loading and lookup APIs.
pub use error::ConfigError;
/// Configuration reader and its default location.
pub use loader::{Configuration, DEFAULT_CONFIG_PATH};
/// Logging configuration and its default location.
pub use logging::{DEFAULT_LOG_CONFIG_PATH, LogConfig, LogLevel, LogWriteStyle};
/// Typed configuration section models.
pub use model::*;
