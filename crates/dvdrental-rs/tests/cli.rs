//! End-to-end command runs against a sample config on disk.

use clap::Parser;
use dvdrental_rs::{Cli, run};
use dvdrental_rs_test_utils::{write_file, write_sample_config};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::tempdir;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dvdrental").chain(args.iter().copied()))
        .expect("parse args")
}

#[test]
fn project_is_the_default_command() {
    let dir = tempdir().expect("tempdir");
    let config = write_sample_config(dir.path());
    let output = run(&cli(&["--config", config.to_str().expect("utf8")])).expect("run");
    assert_eq!(
        output,
        "name: Python Development Baseline Template\n\
         description: Just a cookiecutter starter template\n\
         version: 1.0.0\n\
         author: python engineer"
    );
}

#[test]
fn project_renders_as_json() {
    let dir = tempdir().expect("tempdir");
    let config = write_sample_config(dir.path());
    let output = run(&cli(&[
        "--config",
        config.to_str().expect("utf8"),
        "--format",
        "json",
        "project",
    ]))
    .expect("run");
    let json: Value = serde_json::from_str(&output).expect("json");
    assert_eq!(json["name"], "Python Development Baseline Template");
    assert_eq!(json["version"], "1.0.0");
}

/// Testers are listed by username; passwords stay out of text output.
#[test]
fn config_lists_environments_and_testers() {
    let dir = tempdir().expect("tempdir");
    let config = write_sample_config(dir.path());
    let output = run(&cli(&["--config", config.to_str().expect("utf8"), "config"])).expect("run");
    let expected = format!(
        "config file: {}\nenvironments: dev, production, test\ntester 1: JohnWick\ntester 2: SofiaAl-Azwar",
        config.display()
    );
    assert_eq!(output, expected);
    assert!(!output.contains("SeeYouAt4"));
}

#[test]
fn views_counts_rows_in_seeded_memory_database() {
    let dir = tempdir().expect("tempdir");
    let config = write_sample_config(dir.path());
    let output = run(&cli(&["--config", config.to_str().expect("utf8"), "views"])).expect("run");
    assert_eq!(
        output,
        "customer_list: 3\nfilm_list: 4\nnicer_but_slower_film_list: 4\n\
         sales_by_film_category: 3\nsales_by_store: 2\nstaff_list: 2"
    );
}

/// `--database` points at a file; the schema is created and seeded there.
#[test]
fn database_flag_overrides_config_path() {
    let dir = tempdir().expect("tempdir");
    let config = write_sample_config(dir.path());
    let db_path = dir.path().join("rental.db");
    let args = [
        "--config",
        config.to_str().expect("utf8"),
        "--database",
        db_path.to_str().expect("utf8"),
        "film",
        "1",
    ];
    let output = run(&cli(&args)).expect("run");
    assert!(output.starts_with("Academy Dinosaur (1)\nlanguage: English\nrental rate: 0.99"));
    assert!(db_path.exists());

    // second run reuses the seeded file
    let again = run(&cli(&args)).expect("rerun");
    assert_eq!(again, output);
}

#[test]
fn schema_json_lists_every_table() {
    let dir = tempdir().expect("tempdir");
    let config = write_sample_config(dir.path());
    let output = run(&cli(&[
        "--config",
        config.to_str().expect("utf8"),
        "--format",
        "json",
        "schema",
    ]))
    .expect("run");
    let json: Value = serde_json::from_str(&output).expect("json");
    assert_eq!(json["namespace"], "public");
    assert_eq!(json["tables"].as_array().expect("tables").len(), 15);
    assert_eq!(json["views"].as_array().expect("views").len(), 6);
}

#[test]
fn missing_config_reports_path() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    let err = run(&cli(&["--config", missing.to_str().expect("utf8")])).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("file not found at"), "{message}");
}

#[test]
fn config_without_database_section_uses_memory_without_data() {
    let dir = tempdir().expect("tempdir");
    let config = write_file(
        dir.path(),
        "bare.toml",
        "[project]\nname = \"bare\"\nversion = \"0.1.0\"\n",
    );
    let output = run(&cli(&["--config", config.to_str().expect("utf8"), "views"])).expect("run");
    assert!(output.lines().all(|line| line.ends_with(": 0")), "{output}");
}
