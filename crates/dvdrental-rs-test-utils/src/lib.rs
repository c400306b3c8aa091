//! Test helpers shared across dvdrental crates.

pub mod config;
pub mod store;

pub use config::{
    SAMPLE_CONFIG, SAMPLE_LOG_CONFIG, write_file, write_sample_config, write_sample_log_config,
};
pub use store::{seeded_database, seeded_database_at};
