//! Default config location, resolved against the working directory.
//!
//! Kept in its own test binary because it changes the process working
//! directory.

use dvdrental_rs_config::{Configuration, DEFAULT_CONFIG_PATH, DEFAULT_LOG_CONFIG_PATH, LogConfig};
use pretty_assertions::assert_eq;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// `load_default` reads `./config.toml` and reports that path back.
#[test]
fn load_default_reads_config_in_working_directory() {
    assert_eq!(DEFAULT_CONFIG_PATH, "./config.toml");
    assert_eq!(DEFAULT_LOG_CONFIG_PATH, "./log_config.toml");

    let temp = tempdir().expect("tmp");
    fs::write(
        temp.path().join("config.toml"),
        "[project]\nname = \"dvdrental\"\nversion = \"1.0.0\"\n",
    )
    .expect("write config");
    fs::write(temp.path().join("log_config.toml"), "level = \"warn\"\n").expect("write log config");
    let previous = env::current_dir().expect("cwd");
    env::set_current_dir(temp.path()).expect("enter temp dir");

    let mut config = Configuration::new();
    let loaded = config.load_default();
    let log_config = LogConfig::load(DEFAULT_LOG_CONFIG_PATH);
    env::set_current_dir(previous).expect("restore cwd");

    loaded.expect("load default");
    assert_eq!(
        config.get_config_file_path().expect("path"),
        Path::new("./config.toml")
    );
    assert_eq!(
        config.project_settings().expect("project").name,
        "dvdrental"
    );
    assert_eq!(
        log_config.expect("log config").level,
        dvdrental_rs_config::LogLevel::Warn
    );
}
