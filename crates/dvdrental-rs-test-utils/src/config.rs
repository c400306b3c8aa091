use std::fs;
use std::path::{Path, PathBuf};

pub const SAMPLE_CONFIG: &str = r#"[project]
name = "Python Development Baseline Template"
description = "Just a cookiecutter starter template"
version = "1.0.0"
author = "python engineer"

[environment]
[environment.dev]
env = "dev"
[environment.test]
env = "test"
[environment.production]
env = "production"

[[testers]]
id = 1
username = "JohnWick"
password = "SeeYouAt4"

[[testers]]
id = 2
username = "SofiaAl-Azwar"
password = "DogsFirst"

[database]
path = ":memory:"
seed_sample = true
"#;

pub const SAMPLE_LOG_CONFIG: &str = r#"level = "warn"
write_style = "never"
timestamps = false

[modules]
dvdrental_rs_store = "debug"
"#;

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create fixture dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

pub fn write_sample_config(dir: &Path) -> PathBuf {
    write_file(dir, "config.toml", SAMPLE_CONFIG)
}

pub fn write_sample_log_config(dir: &Path) -> PathBuf {
    write_file(dir, "log_config.toml", SAMPLE_LOG_CONFIG)
}
