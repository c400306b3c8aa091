//! Public surface for dvdrental-rs.
//!
//! Re-exports the config, schema and store crates and provides the logging
//! bootstrap and command runner used by the `dvdrental` binary.

pub mod app;
pub mod logging;

/// Re-export for convenience.
pub use dvdrental_rs_config as config;
/// Re-export for convenience.
pub use dvdrental_rs_schema as schema;
/// Re-export for convenience.
pub use dvdrental_rs_store as store;

pub use app::{Cli, Command, OutputFormat, run};
pub use logging::{emit_level_samples, init_logging};
