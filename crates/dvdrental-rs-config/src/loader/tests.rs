//! Tests for single-file configuration loading.

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[project]
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
"#;

/// Write TOML contents to a path, creating parent directories if needed.
fn write_toml(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Load the sample config from a fresh temp directory.
fn load_sample() -> (TempDir, Configuration) {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.toml");
    write_toml(&path, SAMPLE);
    let config = Configuration::from_path(&path).expect("config");
    (temp, config)
}

/// Missing files fail and name the attempted path.
#[test]
fn missing_file_reports_path() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("no_such_file.toml");
    let mut config = Configuration::new();
    let err = config.load(&path).unwrap_err();
    let msg = format!("{err}");
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
    assert!(msg.contains("file not found at"));
    assert!(msg.contains("no_such_file.toml"));
    assert!(!config.is_loaded());
}

/// Reading before load fails instead of returning stale data.
#[test]
fn reads_before_load_fail() {
    let config = Configuration::new();
    assert!(matches!(config.get_config(), Err(ConfigError::NotLoaded)));
    assert!(matches!(
        config.get_config_file_path(),
        Err(ConfigError::NotLoaded)
    ));
    assert!(matches!(config.get_project(), Err(ConfigError::NotLoaded)));
}

/// A failed load keeps the previously loaded content.
#[test]
fn failed_reload_keeps_previous_state() {
    let (temp, mut config) = load_sample();
    let original = config.get_config_file_path().expect("path").to_path_buf();
    assert!(config.load(temp.path().join("gone.toml")).is_err());
    assert_eq!(config.get_config_file_path().expect("path"), original);
}

#[test]
fn unknown_key_is_missing() {
    let (_temp, config) = load_sample();
    let err = config.get("No_Such_Key").unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "No_Such_Key"));
}

#[test]
fn loaded_config_is_non_empty_and_keeps_path() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.toml");
    write_toml(&path, SAMPLE);
    let mut config = Configuration::new();
    config.load(&path).expect("load");
    assert!(!config.get_config().expect("config").is_empty());
    assert_eq!(config.get_config_file_path().expect("path"), path.as_path());
}

#[test]
fn project_section_values() {
    let (_temp, config) = load_sample();
    let project = config.get_project().expect("project");
    assert_eq!(
        project["name"].as_str(),
        Some("Python Development Baseline Template")
    );
    assert_eq!(
        project["description"].as_str(),
        Some("Just a cookiecutter starter template")
    );
    assert_eq!(project["version"].as_str(), Some("1.0.0"));
    assert_eq!(project["author"].as_str(), Some("python engineer"));
    assert_eq!(project.len(), 4);
}

#[test]
fn missing_project_section_is_missing_key() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.toml");
    write_toml(&path, "[environment.dev]\nenv = \"dev\"\n");
    let config = Configuration::from_path(&path).expect("config");
    let err = config.get_project().unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "project"));
}

#[test]
fn nested_environment_values() {
    let (_temp, config) = load_sample();
    for env in ["dev", "test", "production"] {
        let value = config
            .lookup(&format!("environment.{env}.env"))
            .expect("env");
        assert_eq!(value.as_str(), Some(env));
    }
    let environments = config.environments().expect("environments");
    assert_eq!(environments.len(), 3);
    assert_eq!(environments["production"].env, "production");
}

#[test]
fn array_of_tables() {
    let (_temp, config) = load_sample();
    let testers = config.get("testers").expect("testers");
    assert_eq!(testers.as_array().map(Vec::len), Some(2));

    let tester = config.lookup("testers.0").expect("first tester");
    assert_eq!(tester["id"].as_integer(), Some(1));
    assert_eq!(tester["username"].as_str(), Some("JohnWick"));
    assert_eq!(tester["password"].as_str(), Some("SeeYouAt4"));

    let typed = config.testers().expect("typed testers");
    assert_eq!(
        typed[0],
        Tester {
            id: 1,
            username: "JohnWick".to_string(),
            password: "SeeYouAt4".to_string(),
        }
    );
}

#[test]
fn typed_project_settings() {
    let (_temp, config) = load_sample();
    let project = config.project_settings().expect("project");
    assert_eq!(project.version, "1.0.0");
    assert_eq!(project.author, "python engineer");
}

#[test]
fn section_rejects_scalar_values() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.toml");
    write_toml(&path, "project = \"flat\"\n");
    let config = Configuration::from_path(&path).expect("config");
    let err = config.get_project().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidType { expected: "table", .. }));
}

#[test]
fn decode_failure_names_the_key() {
    let (_temp, config) = load_sample();
    let err = config.get_as::<Vec<Tester>>("project").unwrap_err();
    assert!(format!("{err}").contains("project"));
}

#[test]
fn database_settings_default_when_absent() {
    let (_temp, config) = load_sample();
    let settings = config.database_settings().expect("database");
    assert!(settings.is_in_memory());
    assert!(!settings.seed_sample);
}

#[test]
fn database_settings_from_section() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.toml");
    write_toml(
        &path,
        "[database]\npath = \"dvdrental.db\"\nseed_sample = true\n",
    );
    let config = Configuration::from_path(&path).expect("config");
    let settings = config.database_settings().expect("database");
    assert_eq!(settings.path, PathBuf::from("dvdrental.db"));
    assert!(settings.seed_sample);
    assert!(!settings.is_in_memory());
}

#[test]
fn invalid_toml_is_parse_error() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.toml");
    write_toml(&path, "[project\nname = ");
    let err = Configuration::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)));
}
