//! Logging bootstrap for the `dvdrental` binary.

use dvdrental_rs_config::{LogConfig, LogWriteStyle};
use env_logger::{Builder, WriteStyle};
use log::{debug, error, info, warn};

/// Install an `env_logger` logger described by `config`.
///
/// `RUST_LOG` is applied on top of the file settings. Returns `false` when a
/// logger is already installed, in which case nothing changes.
pub fn init_logging(config: &LogConfig) -> bool {
    let mut builder = Builder::new();
    builder.filter_level(config.level.into());
    for (module, level) in &config.modules {
        builder.filter_module(module, (*level).into());
    }
    builder.write_style(match config.write_style {
        LogWriteStyle::Auto => WriteStyle::Auto,
        LogWriteStyle::Always => WriteStyle::Always,
        LogWriteStyle::Never => WriteStyle::Never,
    });
    if !config.timestamps {
        builder.format_timestamp(None);
    }
    builder.parse_default_env();
    builder.try_init().is_ok()
}

/// One record per level, so a fresh logging config can be checked by eye.
pub fn emit_level_samples() {
    debug!("debugging message from main");
    info!("info message from main");
    warn!("warning message from main");
    error!("error message from main");
    error!("critical message from main");
}
