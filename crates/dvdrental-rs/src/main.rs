use anyhow::Context;
use clap::Parser;
use dvdrental_rs::config::LogConfig;
use dvdrental_rs::{Cli, emit_level_samples, init_logging, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::load_or_default(&cli.log_config)
        .with_context(|| format!("loading logging config from {}", cli.log_config.display()))?;
    init_logging(&log_config);
    emit_level_samples();

    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}
