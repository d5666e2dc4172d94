//! Logging setup. Output goes to stderr; stdout carries the tier word.

use crate::error::{CasteError, Result};
use std::io;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "warn";

/// Filter used when `RUST_LOG` is unset: `-v`/`-vv` beat the config level.
pub fn default_filter(verbosity: u8, config_level: Option<&str>) -> &str {
    match verbosity {
        0 => config_level.unwrap_or(DEFAULT_LEVEL),
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
pub fn init_logging(verbosity: u8, config_level: Option<&str>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbosity, config_level))
            .map_err(|err| CasteError::Config(format!("invalid log level: {}", err)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| CasteError::Config(format!("failed to initialize logging: {}", err)))
}
