//! Command-line surface of the `dvdrental` binary.
//!
//! [`run`] does all the work and returns the rendered output, so commands can
//! be exercised without spawning a process.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dvdrental_rs_config::{
    Configuration, DEFAULT_CONFIG_PATH, DEFAULT_LOG_CONFIG_PATH, DatabaseSettings,
};
use dvdrental_rs_schema::{Schema, dvdrental};
use dvdrental_rs_store::{Database, Queries};
use log::{debug, info};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "dvdrental", version)]
#[command(about = "Inspect the dvdrental sample database and its configuration", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Path to the TOML logging config file
    #[arg(long, default_value = DEFAULT_LOG_CONFIG_PATH)]
    pub log_config: PathBuf,
    /// SQLite database path, overriding `[database].path`
    #[arg(long)]
    pub database: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the `[project]` settings (default)
    Project,
    /// Show the config file path, environments and testers
    Config,
    /// Row counts of every reporting view
    Views,
    /// Table and view descriptors
    Schema,
    /// One film with its language, categories and cast
    Film {
        /// Film id
        id: i64,
    },
}

/// Execute `cli` and return what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    let configuration = Configuration::from_path(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let command = cli.command.clone().unwrap_or(Command::Project);
    debug!("running command (command={command:?}, format={:?})", cli.format);

    match command {
        Command::Project => {
            let project = configuration.project_settings()?;
            render(cli.format, &project, || {
                format!(
                    "name: {}\ndescription: {}\nversion: {}\nauthor: {}",
                    project.name, project.description, project.version, project.author
                )
            })
        }
        Command::Config => show_config(cli.format, &configuration),
        Command::Views => {
            let database = open_database(cli, &configuration)?;
            let counts = database.view_counts()?;
            render(cli.format, &counts, || {
                counts
                    .iter()
                    .map(|count| format!("{}: {}", count.view, count.rows))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Schema => {
            let schema = dvdrental();
            render(cli.format, &schema, || describe_schema(&schema))
        }
        Command::Film { id } => {
            let database = open_database(cli, &configuration)?;
            let details = database.film(id)?;
            let actors = database.film_actors(id)?;
            let json = serde_json::json!({ "film": &details, "actors": &actors });
            render(cli.format, &json, || {
                let categories: Vec<&str> = details
                    .categories
                    .iter()
                    .map(|category| category.name.as_str())
                    .collect();
                let cast: Vec<String> = actors.iter().map(|actor| actor.full_name()).collect();
                format!(
                    "{} ({})\nlanguage: {}\nrental rate: {}\ncategories: {}\nactors: {}",
                    details.film.title,
                    details.film.film_id,
                    details.language.name,
                    details.film.rental_rate,
                    categories.join(", "),
                    cast.join(", ")
                )
            })
        }
    }
}

fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn show_config(format: OutputFormat, configuration: &Configuration) -> Result<String> {
    let path = configuration.get_config_file_path()?;
    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "path": path,
            "config": configuration.get_config()?,
        });
        return Ok(serde_json::to_string_pretty(&json)?);
    }

    let mut out = format!("config file: {}", path.display());
    let environments = configuration.environments()?;
    let names: Vec<&str> = environments.keys().map(String::as_str).collect();
    write!(out, "\nenvironments: {}", names.join(", "))?;
    for tester in configuration.testers()? {
        write!(out, "\ntester {}: {}", tester.id, tester.username)?;
    }
    Ok(out)
}

fn describe_schema(schema: &Schema) -> String {
    let mut lines = Vec::with_capacity(schema.tables.len() + schema.views.len());
    for table in &schema.tables {
        lines.push(format!(
            "table {} ({})",
            schema.qualified_name(&table.name),
            table.column_names().join(", ")
        ));
    }
    for view in &schema.views {
        lines.push(format!("view {}", schema.qualified_name(&view.name)));
    }
    lines.join("\n")
}

fn open_database(cli: &Cli, configuration: &Configuration) -> Result<Database> {
    let mut settings: DatabaseSettings = configuration.database_settings()?;
    if let Some(path) = &cli.database {
        settings.path = path.clone();
    }
    let database = Database::from_settings(&settings)
        .with_context(|| format!("opening database at {}", settings.path.display()))?;
    info!("database ready (location={})", database.location());
    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_project_and_text() {
        let cli = Cli::try_parse_from(["dvdrental"]).expect("parse");
        assert_eq!(cli.command, None);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.log_config, PathBuf::from(DEFAULT_LOG_CONFIG_PATH));
    }

    #[test]
    fn parses_film_subcommand_with_overrides() {
        let cli = Cli::try_parse_from([
            "dvdrental",
            "--format",
            "json",
            "--database",
            "rental.db",
            "film",
            "133",
        ])
        .expect("parse");
        assert_eq!(cli.command, Some(Command::Film { id: 133 }));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.database, Some(PathBuf::from("rental.db")));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["dvdrental", "--format", "yaml"]).is_err());
    }
}
